//! `thermogov sensors` — list built-in temperature sensors.

use thermogov_core::all_sensors;

pub fn run(read: bool) {
    let mut sensors = all_sensors();
    let available = sensors.iter().filter(|s| s.is_available()).count();

    println!(
        "Found {available} of {} temperature sensor(s) available:\n",
        sensors.len()
    );
    let width = name_width(sensors.iter().map(|s| s.name()));
    for sensor in &mut sensors {
        let info = sensor.info().clone();
        let usable = sensor.is_available();
        let mark = if usable { "\u{2705}" } else { "\u{274C}" };
        println!(
            "  {mark} {:<width$} [{:<7}] {}",
            info.name,
            info.kind.to_string(),
            info.description
        );
        if read && usable {
            match sensor.read() {
                Ok(t) => println!("       reading: {t:.1}°C"),
                Err(e) => println!("       reading failed: {e}"),
            }
        }
    }
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(str::len).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_column_fits_longest_sensor() {
        let sensors = all_sensors();
        let width = name_width(sensors.iter().map(|s| s.name()));
        assert!(sensors.iter().all(|s| s.name().len() <= width));
        assert_eq!(width, "sysfs_thermal_zone".len());
    }

    #[test]
    fn test_name_width_empty() {
        assert_eq!(name_width(std::iter::empty()), 0);
    }
}
