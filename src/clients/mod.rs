mod macros;
mod cart_client;
mod product_client;
mod stock_client;

pub use cart_client::CartClient;
pub use product_client::ProductClient;
pub use stock_client::StockClient;
