use crate::attributes::{
    bool_attr, number_attr, optional_attr, required_attr, short_title, timestamp_attr,
};
use crate::Error;
use chrono::{DateTime, Utc};
use roxmltree::Node;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One entry of the `routeList` command
#[derive(Debug, Clone, Default)]
pub struct RouteSummary {
    pub tag: String,
    pub title: String,
    /// Abbreviated title, defaulted to [RouteSummary::title] when the feed leaves it out
    pub short_title: String,
}

impl RouteSummary {
    pub(crate) fn from_element(el: Node) -> Result<Self, Error> {
        let title = required_attr(el, "title")?.to_owned();
        Ok(RouteSummary {
            tag: required_attr(el, "tag")?.to_owned(),
            short_title: short_title(el, &title),
            title,
        })
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// A WGS84 coordinate, embedded in every located record
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub(crate) fn from_element(el: Node) -> Result<Self, Error> {
        Ok(Point {
            lat: number_attr(el, "lat")?,
            lon: number_attr(el, "lon")?,
        })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// A bus stop as listed in a `routeConfig` response
#[derive(Debug, Clone, Default)]
pub struct Stop {
    pub tag: String,
    pub title: String,
    pub short_title: String,
    /// The numeric id used by the predictions commands; not every stop has one
    pub id: Option<String>,
    pub point: Point,
}

impl Stop {
    pub(crate) fn from_element(el: Node) -> Result<Self, Error> {
        let title = required_attr(el, "title")?.to_owned();
        Ok(Stop {
            tag: required_attr(el, "tag")?.to_owned(),
            short_title: short_title(el, &title),
            id: optional_attr(el, "stopId"),
            point: Point::from_element(el)?,
            title,
        })
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// One travel direction of a route, with its ordered stop sequence
#[derive(Debug, Clone, Default)]
pub struct Direction {
    pub tag: String,
    pub title: String,
    pub use_for_ui: bool,
    pub stops: Vec<Arc<Stop>>,
}

impl Direction {
    /// The `<stop>` children of a direction only carry tags; they must be
    /// resolved against the stops of the owning route, so that route's
    /// lookup is taken explicitly
    pub(crate) fn from_element(
        el: Node,
        stops_by_tag: &HashMap<String, Arc<Stop>>,
    ) -> Result<Self, Error> {
        let mut stops = Vec::new();
        for stop_el in el.children().filter(|n| n.has_tag_name("stop")) {
            let tag = required_attr(stop_el, "tag")?;
            let stop = stops_by_tag
                .get(tag)
                .ok_or_else(|| Error::ReferenceError(tag.to_owned()))?;
            stops.push(Arc::clone(stop));
        }
        Ok(Direction {
            tag: required_attr(el, "tag")?.to_owned(),
            title: required_attr(el, "title")?.to_owned(),
            use_for_ui: bool_attr(el, "useForUI"),
            stops,
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// One polyline segment of a route's geometry
#[derive(Debug, Clone, Default)]
pub struct Path {
    pub points: Vec<Point>,
}

impl Path {
    pub(crate) fn from_element(el: Node) -> Result<Self, Error> {
        let points = el
            .children()
            .filter(|n| n.has_tag_name("point"))
            .map(Point::from_element)
            .collect::<Result<_, _>>()?;
        Ok(Path { points })
    }
}

/// Full description of a route from the `routeConfig` command
#[derive(Debug, Clone, Default)]
pub struct Route {
    pub tag: String,
    pub code: Option<String>,
    pub title: String,
    pub short_title: String,
    /// Hex color the agency paints the route with
    pub color: String,
    /// Contrasting color for text drawn over [Route::color]
    pub opposite_color: String,
    pub stops: Vec<Arc<Stop>>,
    pub directions: Vec<Direction>,
    pub paths: Vec<Path>,
}

impl Route {
    pub(crate) fn from_element(el: Node) -> Result<Self, Error> {
        let title = required_attr(el, "title")?.to_owned();

        // Stops first: directions reference them by tag and may only draw
        // from this route's own stop set
        let stops: Vec<Arc<Stop>> = el
            .children()
            .filter(|n| n.has_tag_name("stop"))
            .map(|n| Stop::from_element(n).map(Arc::new))
            .collect::<Result<_, _>>()?;
        let stops_by_tag: HashMap<String, Arc<Stop>> = stops
            .iter()
            .map(|s| (s.tag.clone(), Arc::clone(s)))
            .collect();
        let directions = el
            .children()
            .filter(|n| n.has_tag_name("direction"))
            .map(|n| Direction::from_element(n, &stops_by_tag))
            .collect::<Result<_, _>>()?;
        let paths = el
            .children()
            .filter(|n| n.has_tag_name("path"))
            .map(Path::from_element)
            .collect::<Result<_, _>>()?;

        Ok(Route {
            tag: required_attr(el, "tag")?.to_owned(),
            code: optional_attr(el, "routeCode"),
            short_title: short_title(el, &title),
            color: required_attr(el, "color")?.to_owned(),
            opposite_color: required_attr(el, "oppositeColor")?.to_owned(),
            title,
            stops,
            directions,
            paths,
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// A forecasted arrival (or departure) of one vehicle at one stop
#[derive(Debug, Clone)]
pub struct Prediction {
    pub seconds: u32,
    /// [Prediction::seconds] rounded down, as the feed displays it
    pub minutes: u32,
    pub epoch_time: DateTime<Utc>,
    pub is_departure: bool,
    pub dir_tag: Option<String>,
    pub block: Option<String>,
}

impl Prediction {
    pub(crate) fn from_element(el: Node) -> Result<Self, Error> {
        Ok(Prediction {
            seconds: number_attr(el, "seconds")?,
            minutes: number_attr(el, "minutes")?,
            epoch_time: timestamp_attr(el, "epochTime")?,
            is_departure: bool_attr(el, "isDeparture"),
            dir_tag: optional_attr(el, "dirTag"),
            block: optional_attr(el, "block"),
        })
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.minutes)
    }
}

/// All predictions the feed holds for one stop, grouped by direction
#[derive(Debug, Clone, Default)]
pub struct Predictions {
    /// Keyed by direction *title*, not tag. Should the feed repeat a title
    /// the later group replaces the earlier one; whether that ever happens
    /// upstream is unconfirmed
    pub directions: HashMap<String, Vec<Prediction>>,
    pub messages: Vec<String>,
}

impl Predictions {
    pub(crate) fn from_element(el: Node) -> Result<Self, Error> {
        let mut directions = HashMap::new();
        for direction_el in el.children().filter(|n| n.has_tag_name("direction")) {
            let title = required_attr(direction_el, "title")?;
            let predictions = direction_el
                .children()
                .filter(|n| n.has_tag_name("prediction"))
                .map(Prediction::from_element)
                .collect::<Result<_, _>>()?;
            directions.insert(title.to_owned(), predictions);
        }
        let messages = el
            .children()
            .filter(|n| n.has_tag_name("message"))
            .map(|n| required_attr(n, "text").map(ToOwned::to_owned))
            .collect::<Result<_, _>>()?;
        Ok(Predictions {
            directions,
            messages,
        })
    }
}

/// A vehicle position report from the `vehicleLocations` command
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: String,
    pub route_tag: String,
    /// Absent when the vehicle is not serving a direction (deadheading)
    pub dir_tag: Option<String>,
    pub secs_since_report: u32,
    pub predictable: bool,
    /// Degrees from north; the feed reports a negative value when unknown
    pub heading: i32,
    pub point: Point,
}

impl Vehicle {
    pub(crate) fn from_element(el: Node) -> Result<Self, Error> {
        Ok(Vehicle {
            id: required_attr(el, "id")?.to_owned(),
            route_tag: required_attr(el, "routeTag")?.to_owned(),
            dir_tag: optional_attr(el, "dirTag"),
            secs_since_report: number_attr(el, "secsSinceReport")?,
            predictable: bool_attr(el, "predictable"),
            heading: number_attr(el, "heading")?,
            point: Point::from_element(el)?,
        })
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} on {} at {}", self.id, self.route_tag, self.point)
    }
}
