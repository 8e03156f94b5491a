use crate::attributes::timestamp_attr;
use crate::objects::*;
use crate::Error;
use chrono::{DateTime, Utc};
use roxmltree::Document;
use url::Url;

/// Base endpoint of the public NextBus XML feed
pub const BASE_URL: &str = "http://webservices.nextbus.com/service/publicXMLFeed";

/// Handle on the feed of one transit agency
///
/// Every query performs a single blocking GET followed by one XML parse;
/// there are no retries and no caching, callers wanting polling or timeouts
/// build that around the handle.
///
/// ```no_run
/// use nextbus_feed::Feed;
///
/// # fn main() -> Result<(), nextbus_feed::Error> {
/// let feed = Feed::new("sf-muni");
/// let (vehicles, last_time) = feed.vehicle_locations("38", None)?;
/// // pass last_time back to only receive vehicles that moved since
/// let (updates, _) = feed.vehicle_locations("38", Some(last_time))?;
/// # Ok(())
/// # }
/// ```
pub struct Feed {
    base_url: String,
    agency: String,
    client: reqwest::blocking::Client,
}

impl Feed {
    /// A handle on the given agency, e.g. `Feed::new("sf-muni")`
    pub fn new(agency: &str) -> Feed {
        Feed::with_base_url(BASE_URL, agency)
    }

    pub(crate) fn with_base_url(base_url: &str, agency: &str) -> Feed {
        Feed {
            base_url: base_url.to_owned(),
            agency: agency.to_owned(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Builds the query url for one command; the agency parameter is always
    /// injected and pairs may repeat (the multi-stop command sends one
    /// `stops` pair per requested stop)
    pub(crate) fn feed_url(&self, pairs: &[(&str, &str)]) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("a", &self.agency);
            for (name, value) in pairs {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }

    fn fetch(&self, pairs: &[(&str, &str)]) -> Result<String, Error> {
        let url = self.feed_url(pairs)?;
        Ok(self.client.get(url).send()?.error_for_status()?.text()?)
    }

    /// All routes the agency runs, as summaries (`routeList` command)
    pub fn route_list(&self) -> Result<Vec<RouteSummary>, Error> {
        let body = self.fetch(&[("command", "routeList")])?;
        parse_route_list(&body)
    }

    /// Full configuration of every route of the agency (`routeConfig` command)
    pub fn route_config(&self) -> Result<Vec<Route>, Error> {
        let body = self.fetch(&[("command", "routeConfig")])?;
        parse_routes(&body)
    }

    /// Full configuration of a single route
    pub fn route(&self, tag: &str) -> Result<Route, Error> {
        let body = self.fetch(&[("command", "routeConfig"), ("r", tag)])?;
        parse_routes(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::ReferenceError(tag.to_owned()))
    }

    /// Arrival predictions for one stop (`predictions` command)
    pub fn predictions_for_stop(&self, stop_id: &str) -> Result<Predictions, Error> {
        let body = self.fetch(&[("command", "predictions"), ("stopId", stop_id)])?;
        parse_predictions(&body)?
            .into_iter()
            .next()
            .ok_or(Error::MissingElement("predictions"))
    }

    /// Arrival predictions for several (route tag, stop tag) pairs at once,
    /// one [Predictions] per requested stop (`predictionsForMultiStops`
    /// command)
    ///
    /// The upstream command is poorly documented and the `route|null|stop`
    /// pair encoding has not been validated against a live feed; prefer
    /// [Feed::predictions_for_stop] where possible.
    pub fn predictions_for_stops(
        &self,
        route_stop_pairs: &[(&str, &str)],
    ) -> Result<Vec<Predictions>, Error> {
        let stops: Vec<String> = route_stop_pairs
            .iter()
            .map(|(route, stop)| format!("{route}|null|{stop}"))
            .collect();
        let mut pairs = vec![("command", "predictionsForMultiStops")];
        pairs.extend(stops.iter().map(|s| ("stops", s.as_str())));
        let body = self.fetch(&pairs)?;
        parse_predictions(&body)
    }

    /// Positions of the vehicles serving one route (`vehicleLocations`
    /// command), along with the feed's "last time" marker
    ///
    /// With `last_time` from a previous call only vehicles that reported
    /// since then are returned; without it the feed sends the full current
    /// snapshot (`t=0` by protocol convention). Thread the returned marker
    /// into the next call to poll incrementally.
    pub fn vehicle_locations(
        &self,
        route: &str,
        last_time: Option<DateTime<Utc>>,
    ) -> Result<(Vec<Vehicle>, DateTime<Utc>), Error> {
        let t = to_millis(last_time).to_string();
        let body = self.fetch(&[("command", "vehicleLocations"), ("r", route), ("t", &t)])?;
        parse_vehicle_locations(&body)
    }
}

/// The `t` parameter of `vehicleLocations`: whole milliseconds since the
/// Unix epoch, 0 asking for the full current snapshot
pub(crate) fn to_millis(last_time: Option<DateTime<Utc>>) -> i64 {
    last_time.map_or(0, |t| t.timestamp_millis())
}

pub(crate) fn parse_route_list(body: &str) -> Result<Vec<RouteSummary>, Error> {
    let doc = Document::parse(body)?;
    doc.root_element()
        .children()
        .filter(|n| n.has_tag_name("route"))
        .map(RouteSummary::from_element)
        .collect()
}

pub(crate) fn parse_routes(body: &str) -> Result<Vec<Route>, Error> {
    let doc = Document::parse(body)?;
    doc.root_element()
        .children()
        .filter(|n| n.has_tag_name("route"))
        .map(Route::from_element)
        .collect()
}

pub(crate) fn parse_predictions(body: &str) -> Result<Vec<Predictions>, Error> {
    let doc = Document::parse(body)?;
    doc.root_element()
        .children()
        .filter(|n| n.has_tag_name("predictions"))
        .map(Predictions::from_element)
        .collect()
}

pub(crate) fn parse_vehicle_locations(body: &str) -> Result<(Vec<Vehicle>, DateTime<Utc>), Error> {
    let doc = Document::parse(body)?;
    let root = doc.root_element();
    let last_time_el = root
        .children()
        .find(|n| n.has_tag_name("lastTime"))
        .ok_or(Error::MissingElement("lastTime"))?;
    let last_time = timestamp_attr(last_time_el, "time")?;
    let vehicles = root
        .children()
        .filter(|n| n.has_tag_name("vehicle"))
        .map(Vehicle::from_element)
        .collect::<Result<_, _>>()?;
    Ok((vehicles, last_time))
}
