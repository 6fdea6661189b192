pub mod graphql_client;
pub mod http_client;
