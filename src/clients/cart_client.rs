use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{Cart, ProductId, UpdateAmount};
use crate::error::CartError;
use crate::messages::CartRequest;

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| <$error_type>::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| <$error_type>::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

/// Handle UI layers use to drive the cart service. Cheap to clone.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending shutdown request");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|_| CartError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(CartClient => fn add_product(product_id: ProductId) -> () as CartRequest::AddProduct, Error = CartError);
client_method!(CartClient => fn remove_product(product_id: ProductId) -> () as CartRequest::RemoveProduct, Error = CartError);
client_method!(CartClient => fn update_product_amount(update: UpdateAmount) -> () as CartRequest::UpdateProductAmount, Error = CartError);
client_method!(CartClient => fn get_cart() -> Cart as CartRequest::GetCart, Error = CartError);
client_method!(CartClient => fn cart_size() -> usize as CartRequest::CartSize, Error = CartError);
client_method!(CartClient => fn amount_of(product_id: ProductId) -> Option<u32> as CartRequest::AmountOf, Error = CartError);
