pub mod oauth1;
pub mod reqwest_transport;
pub mod traits;

pub use oauth1::OAuth1Keys;
pub use reqwest_transport::{ReqwestTransport, DEFAULT_TIMEOUT};
pub use traits::{HttpRequest, HttpResponse, HttpTransport};

#[cfg(test)]
pub use traits::MockHttpTransport;
