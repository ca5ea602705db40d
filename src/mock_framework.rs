//! # Mock Framework
//!
//! Utilities for testing the cart against scripted stock and catalog replies.
//!
//! Use [`create_mock_client`] to get a client and a receiver, wrap the client in
//! a [`StockClient`](crate::clients::StockClient) or
//! [`ProductClient`](crate::clients::ProductClient), then answer requests with
//! helpers like [`expect_get`].

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};

/// Creates a mock client and a receiver for asserting requests.
///
/// Nothing answers on the receiver unless the test does, so the test decides
/// whether a query succeeds, fails or hangs.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Put request
pub async fn expect_put<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Put { item, respond_to }) => Some((item, respond_to)),
        _ => None,
    }
}

/// Asserts nothing else was sent. Only meaningful once the caller has finished.
pub fn expect_idle<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> bool {
    receiver.try_recv().is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::StockClient;
    use crate::domain::Stock;

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<Stock>(10);
        let client = StockClient::new(inner);

        let put_task = tokio::spawn({
            let client = client.clone();
            async move { client.put_stock(Stock::new(4, 12)).await }
        });
        let (item, responder) = expect_put(&mut receiver).await.expect("Expected Put request");
        assert_eq!(item, Stock::new(4, 12));
        responder.send(Ok(None)).unwrap();
        assert_eq!(put_task.await.unwrap(), Ok(None));

        let get_task = tokio::spawn(async move { client.get_stock(4).await });
        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, 4);
        responder.send(Ok(Some(Stock::new(4, 12)))).unwrap();

        assert_eq!(get_task.await.unwrap(), Ok(Stock::new(4, 12)));
        assert!(expect_idle(&mut receiver));
    }
}
