use std::fmt;

/// Text shown for a metric that has not been reported yet.
pub const NO_DATA: &str = "N/A";

/// One quantity reported by the air quality sensor.
///
/// The declaration order is the order the display rotates through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
    Co2,
    Nox,
    Pm1_0,
    Pm2_5,
    Pm4_0,
    Pm10_0,
    Vaping,
    Voc,
    Aqi,
}

impl Metric {
    pub const COUNT: usize = 11;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Co2,
        Metric::Nox,
        Metric::Pm1_0,
        Metric::Pm2_5,
        Metric::Pm4_0,
        Metric::Pm10_0,
        Metric::Vaping,
        Metric::Voc,
        Metric::Aqi,
    ];

    /// Key as it appears in the sensor's metadata stream.
    pub fn wire_key(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Co2 => "CO2",
            Metric::Nox => "NOx",
            Metric::Pm1_0 => "PM1.0",
            Metric::Pm2_5 => "PM2.5",
            Metric::Pm4_0 => "PM4.0",
            Metric::Pm10_0 => "PM10.0",
            Metric::Vaping => "Vaping",
            Metric::Voc => "VOC",
            Metric::Aqi => "AQI",
        }
    }

    /// Exact, case-sensitive lookup of a trimmed wire key.
    pub fn from_wire_key(key: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.wire_key() == key)
    }

    /// Label used on the display when the config does not override it.
    pub fn default_label(self) -> &'static str {
        match self {
            Metric::Vaping => "Vaping/Smoking",
            other => other.wire_key(),
        }
    }

    /// Turns a raw sensor value into display text. Units are attached here,
    /// never at display time.
    pub fn format(self, raw: &str) -> MetricValue {
        let text = match self {
            Metric::Temperature => format!("{raw}°C"),
            Metric::Humidity => format!("{raw}% RH"),
            Metric::Co2 => format!("{raw} ppm"),
            Metric::Pm1_0 | Metric::Pm2_5 | Metric::Pm4_0 | Metric::Pm10_0 => {
                format!("{raw} µg/m³")
            }
            Metric::Vaping => {
                if raw == "0" {
                    "No".to_string()
                } else {
                    "Yes".to_string()
                }
            }
            Metric::Nox | Metric::Voc | Metric::Aqi => raw.to_string(),
        };
        MetricValue::Reading(text)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_key())
    }
}

/// Latest display-ready value of one metric.
///
/// `NoData` is its own variant so a sensor that literally sends "N/A" is
/// still a reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MetricValue {
    #[default]
    NoData,
    Reading(String),
}

impl MetricValue {
    pub fn is_no_data(&self) -> bool {
        matches!(self, MetricValue::NoData)
    }

    pub fn as_str(&self) -> &str {
        match self {
            MetricValue::NoData => NO_DATA,
            MetricValue::Reading(text) => text,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owned copy of every cache slot, taken at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorSnapshot {
    values: [MetricValue; Metric::COUNT],
}

impl SensorSnapshot {
    pub fn get(&self, metric: Metric) -> &MetricValue {
        &self.values[metric.index()]
    }

    pub(crate) fn set(&mut self, metric: Metric, value: MetricValue) {
        self.values[metric.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &MetricValue)> {
        Metric::ALL.into_iter().zip(self.values.iter())
    }

    /// True until at least one metric has been reported.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(MetricValue::is_no_data)
    }
}

impl fmt::Display for SensorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (metric, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{metric}='{value}'")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_keys_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_wire_key(metric.wire_key()), Some(metric));
        }
        assert_eq!(Metric::from_wire_key("temperature"), None);
        assert_eq!(Metric::from_wire_key("PM25"), None);
    }

    #[test]
    fn units_are_attached_at_format_time() {
        assert_eq!(Metric::Temperature.format("22.8").as_str(), "22.8°C");
        assert_eq!(Metric::Humidity.format("37.0").as_str(), "37.0% RH");
        assert_eq!(Metric::Co2.format("604").as_str(), "604 ppm");
        assert_eq!(Metric::Pm2_5.format("0.3").as_str(), "0.3 µg/m³");
        assert_eq!(Metric::Aqi.format("3").as_str(), "3");
    }

    #[test]
    fn vaping_flag_maps_to_yes_no() {
        assert_eq!(Metric::Vaping.format("0").as_str(), "No");
        assert_eq!(Metric::Vaping.format("1").as_str(), "Yes");
        assert_eq!(Metric::Vaping.format("0.0").as_str(), "Yes");
    }

    #[test]
    fn sentinel_is_distinct_from_a_literal_reading() {
        let literal = Metric::Voc.format(NO_DATA);
        assert_eq!(literal.as_str(), NO_DATA);
        assert!(!literal.is_no_data());
        assert!(MetricValue::NoData.is_no_data());
        assert_ne!(literal, MetricValue::NoData);
    }

    #[test]
    fn default_snapshot_is_all_sentinels() {
        let snapshot = SensorSnapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.iter().all(|(_, v)| v.to_string() == "N/A"));
        assert_eq!(snapshot.iter().count(), Metric::COUNT);
    }
}
