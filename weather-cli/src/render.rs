use tokio::sync::mpsc::UnboundedReceiver;
use weather_core::{DisplayTemperature, SearchEvent};

/// The one-line label shown for a reading, e.g. `Paris, 26.85°C`.
pub fn label(city_label: &str, temperature: &DisplayTemperature) -> String {
    format!("{city_label}, {temperature}")
}

/// Print every event queued so far.
pub fn drain(events: &mut UnboundedReceiver<SearchEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            SearchEvent::LoadingChanged(true) => eprintln!("Fetching weather..."),
            SearchEvent::LoadingChanged(false) => {}
            SearchEvent::Result { temperature, city_label } => {
                println!("{}", label(&city_label, &temperature));
            }
            SearchEvent::Error { message, .. } => eprintln!("{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::TemperatureUnit;

    #[test]
    fn label_joins_city_and_temperature() {
        let t = DisplayTemperature { value: 80.33, unit: TemperatureUnit::Fahrenheit };
        assert_eq!(label("Current Weather", &t), "Current Weather, 80.33°F");
    }
}
