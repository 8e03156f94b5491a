use nextbus_feed::Feed;

fn main() -> Result<(), nextbus_feed::Error> {
    let feed = Feed::new("sf-muni");
    let (vehicles, last_time) = feed.vehicle_locations("38", None)?;
    for vehicle in &vehicles {
        println!("{}", vehicle);
    }
    println!("last update: {}", last_time);
    Ok(())
}
