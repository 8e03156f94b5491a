//! Client for the [NextBus] public XML feed, the real-time data source many
//! North American transit agencies publish bus routes, stops, vehicle
//! positions and arrival predictions through.
//!
//! Every query is one blocking HTTP GET returning an XML document that gets
//! mapped into plain owned records; there is no polling, caching or retry
//! layer, callers own those concerns.
//!
//! ```no_run
//! use nextbus_feed::Feed;
//!
//! # fn main() -> Result<(), nextbus_feed::Error> {
//! let feed = Feed::new("sf-muni");
//! for route in feed.route_list()? {
//!     println!("{} ({})", route.title, route.tag);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [NextBus]: http://webservices.nextbus.com/service/publicXMLFeed

mod attributes;
pub mod error;
mod feed;
pub mod objects;

pub use error::Error;
pub use feed::{Feed, BASE_URL};
pub use objects::*;
