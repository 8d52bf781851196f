//! Material delivery adapter - hands purchased materials to the backend
//! service that sends them to the user.

mod http_delivery;

pub use http_delivery::HttpMaterialDelivery;
