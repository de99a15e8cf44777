pub mod request_builder;
