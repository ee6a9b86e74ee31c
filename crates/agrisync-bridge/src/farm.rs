//! Farm records rendered by the dashboard pages.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum HealthStatus {
    Healthy,
    Monitor,
    AtRisk,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Monitor => "Monitor",
            HealthStatus::AtRisk => "At Risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CropPhoto {
    pub id: String,
    pub url: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiseaseLog {
    pub id: String,
    pub date: NaiveDate,
    pub symptoms: String,
    pub severity: Severity,
    pub treatment: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FertilizerLog {
    pub id: String,
    pub date: NaiveDate,
    pub fertilizer: String,
    /// Amount in kilograms.
    pub amount_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WaterLog {
    pub id: String,
    pub date: NaiveDate,
    pub amount_liters: f64,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Crop {
    pub id: String,
    pub name: String,
    pub crop_type: String,
    pub sow_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub field_id: String,
    pub health_status: HealthStatus,
    pub photos: Vec<CropPhoto>,
    pub disease_log: Vec<DiseaseLog>,
    pub fertilizer_log: Vec<FertilizerLog>,
    pub water_log: Vec<WaterLog>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    pub crop_id: Option<String>,
    pub worker_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum WorkerRole {
    FieldHand,
    Supervisor,
    Technician,
}

impl WorkerRole {
    pub fn label(&self) -> &'static str {
        match self {
            WorkerRole::FieldHand => "Field Hand",
            WorkerRole::Supervisor => "Supervisor",
            WorkerRole::Technician => "Technician",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Worker {
    pub id: String,
    pub name: String,
    pub role: WorkerRole,
    pub assigned_field_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub worker_id: String,
    pub check_in: NaiveDateTime,
    pub check_out: Option<NaiveDateTime>,
    pub task: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PesticideEntry {
    pub id: String,
    pub name: String,
    pub target: String,
    pub dosage: String,
    pub date: NaiveDate,
    pub safety_guidelines: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rain,
    Storm,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    /// Degrees Celsius.
    pub temp: f64,
    /// Millimeters.
    pub rainfall: f64,
    /// Kilometers per hour.
    pub wind: f64,
    /// Percent.
    pub humidity: f64,
    pub condition: WeatherCondition,
}

impl WeatherDay {
    /// Storm-level wind or heavy rain.
    pub fn is_severe(&self) -> bool {
        self.wind > 30.0 || self.rainfall > 70.0
    }

    pub fn has_high_wind(&self) -> bool {
        self.wind > 20.0
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct YieldPoint {
    pub season: String,
    /// Tonnes.
    pub yield_tonnes: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CostPoint {
    pub month: String,
    pub cost: f64,
    pub output: f64,
}

/// Every table the dashboard pages read from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FarmCatalog {
    pub crops: Vec<Crop>,
    pub fields: Vec<Field>,
    pub workers: Vec<Worker>,
    pub attendance: Vec<AttendanceRecord>,
    pub pesticides: Vec<PesticideEntry>,
    pub forecast: Vec<WeatherDay>,
    pub yields: Vec<YieldPoint>,
    pub costs: Vec<CostPoint>,
}

impl FarmCatalog {
    pub fn crop(&self, id: &str) -> Option<&Crop> {
        self.crops.iter().find(|crop| crop.id == id)
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn worker(&self, id: &str) -> Option<&Worker> {
        self.workers.iter().find(|worker| worker.id == id)
    }

    /// The open attendance record of a worker, if they are checked in.
    pub fn open_attendance(&self, worker_id: &str) -> Option<&AttendanceRecord> {
        self.attendance
            .iter()
            .find(|record| record.worker_id == worker_id && record.check_out.is_none())
    }

    pub fn is_checked_in(&self, worker_id: &str) -> bool {
        self.open_attendance(worker_id).is_some()
    }

    /// Sprays dated `today` or later, in schedule order.
    pub fn upcoming_sprays(&self, today: NaiveDate) -> impl Iterator<Item = &PesticideEntry> {
        self.pesticides.iter().filter(move |entry| entry.date >= today)
    }

    pub fn past_sprays(&self, today: NaiveDate) -> impl Iterator<Item = &PesticideEntry> {
        self.pesticides.iter().filter(move |entry| entry.date < today)
    }

    /// Attendance records whose check-in falls on `day`.
    pub fn attendance_on(&self, day: NaiveDate) -> impl Iterator<Item = &AttendanceRecord> {
        self.attendance
            .iter()
            .filter(move |record| record.check_in.date() == day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn spray(id: &str, date: NaiveDate) -> PesticideEntry {
        PesticideEntry {
            id: id.into(),
            name: "Neem Oil".into(),
            target: "Aphids".into(),
            dosage: "2ml/L".into(),
            date,
            safety_guidelines: "Wear gloves and mask.".into(),
        }
    }

    #[test]
    fn sprays_split_around_today() {
        let catalog = FarmCatalog {
            pesticides: vec![spray("S1", day(10)), spray("S2", day(15)), spray("S3", day(20))],
            ..FarmCatalog::default()
        };

        let upcoming: Vec<&str> = catalog.upcoming_sprays(day(15)).map(|e| e.id.as_str()).collect();
        let past: Vec<&str> = catalog.past_sprays(day(15)).map(|e| e.id.as_str()).collect();
        assert_eq!(upcoming, vec!["S2", "S3"]);
        assert_eq!(past, vec!["S1"]);
    }

    #[test]
    fn open_attendance_marks_worker_checked_in() {
        let check_in = day(15).and_hms_opt(8, 2, 0).unwrap();
        let catalog = FarmCatalog {
            attendance: vec![
                AttendanceRecord {
                    id: "A1".into(),
                    worker_id: "W1".into(),
                    check_in,
                    check_out: Some(day(15).and_hms_opt(17, 5, 0).unwrap()),
                    task: "Tomato planting".into(),
                },
                AttendanceRecord {
                    id: "A2".into(),
                    worker_id: "W2".into(),
                    check_in,
                    check_out: None,
                    task: "Corn field prep".into(),
                },
            ],
            ..FarmCatalog::default()
        };

        assert!(!catalog.is_checked_in("W1"));
        assert!(catalog.is_checked_in("W2"));
        assert_eq!(catalog.attendance_on(day(15)).count(), 2);
        assert_eq!(catalog.attendance_on(day(16)).count(), 0);
    }

    #[test]
    fn severe_weather_thresholds() {
        let mut weather = WeatherDay {
            date: day(15),
            temp: 29.0,
            rainfall: 80.0,
            wind: 12.0,
            humidity: 85.0,
            condition: WeatherCondition::Storm,
        };
        assert!(weather.is_severe());
        assert!(!weather.has_high_wind());

        weather.rainfall = 10.0;
        weather.wind = 25.0;
        assert!(!weather.is_severe());
        assert!(weather.has_high_wind());
    }
}
