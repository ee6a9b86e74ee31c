//! Mock farm data and the attendance mutations the workers page performs.

use agrisync_bridge::farm::{
    AttendanceRecord, CostPoint, Crop, CropPhoto, DiseaseLog, FarmCatalog, FertilizerLog, Field,
    HealthStatus, PesticideEntry, Severity, WaterLog, WeatherCondition, WeatherDay, Worker,
    WorkerRole, YieldPoint,
};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttendanceError {
    #[error("unknown worker {0}")]
    UnknownWorker(String),
    #[error("worker {0} is already checked in")]
    AlreadyCheckedIn(String),
    #[error("worker {0} is not checked in")]
    NotCheckedIn(String),
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default())
}

fn crop(
    id: &str,
    name: &str,
    crop_type: &str,
    (sow_date, harvest_date): (NaiveDate, NaiveDate),
    field_id: &str,
    health_status: HealthStatus,
) -> Crop {
    Crop {
        id: id.to_owned(),
        name: name.to_owned(),
        crop_type: crop_type.to_owned(),
        sow_date,
        harvest_date,
        field_id: field_id.to_owned(),
        health_status,
        photos: Vec::new(),
        disease_log: Vec::new(),
        fertilizer_log: Vec::new(),
        water_log: Vec::new(),
    }
}

fn crops() -> Vec<Crop> {
    let mut tomatoes = crop(
        "C1",
        "Tomatoes",
        "Vegetable",
        (date(2024, 3, 15), date(2024, 7, 20)),
        "F1",
        HealthStatus::Healthy,
    );
    tomatoes.photos.push(CropPhoto {
        id: "p1".into(),
        url: "https://picsum.photos/seed/tomato1/400/300".into(),
        date: date(2024, 6, 10),
    });
    tomatoes.fertilizer_log.push(FertilizerLog {
        id: "f1".into(),
        date: date(2024, 6, 1),
        fertilizer: "NPK 10-10-10".into(),
        amount_kg: 5.0,
    });
    tomatoes.water_log.push(WaterLog {
        id: "w1".into(),
        date: date(2024, 6, 15),
        amount_liters: 50.0,
        duration_minutes: 30,
    });

    let mut corn = crop(
        "C2",
        "Corn",
        "Grain",
        (date(2024, 4, 1), date(2024, 9, 15)),
        "F2",
        HealthStatus::Monitor,
    );
    corn.photos.push(CropPhoto {
        id: "p2".into(),
        url: "https://picsum.photos/seed/corn1/400/300".into(),
        date: date(2024, 6, 12),
    });

    let mut potatoes = crop(
        "C3",
        "Potatoes",
        "Tuber",
        (date(2024, 3, 20), date(2024, 8, 10)),
        "F3",
        HealthStatus::AtRisk,
    );
    potatoes.photos.push(CropPhoto {
        id: "p3".into(),
        url: "https://picsum.photos/seed/potato1/400/300".into(),
        date: date(2024, 6, 14),
    });
    potatoes.disease_log.push(DiseaseLog {
        id: "d1".into(),
        date: date(2024, 6, 14),
        symptoms: "Yellow spots on leaves".into(),
        severity: Severity::Low,
        treatment: "Fungicide spray".into(),
    });

    let wheat = crop(
        "C4",
        "Wheat",
        "Grain",
        (date(2024, 5, 10), date(2024, 10, 25)),
        "F4",
        HealthStatus::Healthy,
    );

    vec![tomatoes, corn, potatoes, wheat]
}

fn fields() -> Vec<Field> {
    [
        ("F1", "North Field", Some("C1"), Some("W1")),
        ("F2", "East Field", Some("C2"), Some("W2")),
        ("F3", "West Field", Some("C3"), Some("W4")),
        ("F4", "South Field", None, None),
    ]
    .into_iter()
    .map(|(id, name, crop_id, worker_id)| Field {
        id: id.to_owned(),
        name: name.to_owned(),
        crop_id: crop_id.map(str::to_owned),
        worker_id: worker_id.map(str::to_owned),
    })
    .collect()
}

fn workers() -> Vec<Worker> {
    [
        ("W1", "Ravi Kumar", WorkerRole::FieldHand, Some("F1")),
        ("W2", "Sita Sharma", WorkerRole::FieldHand, Some("F2")),
        ("W3", "Anil Reddy", WorkerRole::Supervisor, None),
        ("W4", "Priya Patel", WorkerRole::Technician, Some("F3")),
    ]
    .into_iter()
    .map(|(id, name, role, field)| Worker {
        id: id.to_owned(),
        name: name.to_owned(),
        role,
        assigned_field_id: field.map(str::to_owned),
    })
    .collect()
}

fn pesticides(today: NaiveDate) -> Vec<PesticideEntry> {
    let entry = |id: &str, name: &str, target: &str, dosage: &str, date, guidelines: &str| {
        PesticideEntry {
            id: id.to_owned(),
            name: name.to_owned(),
            target: target.to_owned(),
            dosage: dosage.to_owned(),
            date,
            safety_guidelines: guidelines.to_owned(),
        }
    };

    vec![
        entry(
            "S1",
            "Neem Oil",
            "Aphids",
            "2ml/L",
            today - Days::new(5),
            "Wear gloves and mask.",
        ),
        entry(
            "S2",
            "Copper Fungicide",
            "Blight",
            "5g/L",
            today + Days::new(2),
            "Avoid contact with skin.",
        ),
        entry(
            "S3",
            "Spinosad",
            "Caterpillars",
            "1ml/L",
            today + Days::new(10),
            "Do not apply in direct sunlight.",
        ),
    ]
}

fn forecast(today: NaiveDate) -> Vec<WeatherDay> {
    use WeatherCondition::*;

    [
        (28.0, 10.0, 15.0, 60.0, Sunny),
        (26.0, 60.0, 25.0, 75.0, Rain),
        (30.0, 5.0, 12.0, 55.0, Sunny),
        (32.0, 0.0, 8.0, 50.0, Sunny),
        (29.0, 80.0, 35.0, 85.0, Storm),
        (27.0, 20.0, 18.0, 65.0, Cloudy),
        (25.0, 30.0, 22.0, 70.0, Rain),
    ]
    .into_iter()
    .enumerate()
    .map(|(offset, (temp, rainfall, wind, humidity, condition))| WeatherDay {
        date: today + Days::new(offset as u64),
        temp,
        rainfall,
        wind,
        humidity,
        condition,
    })
    .collect()
}

/// The catalog the application starts with. Relative dates (attendance,
/// spray schedule, forecast) are anchored at `now`.
pub fn seed_catalog(now: NaiveDateTime) -> FarmCatalog {
    let today = now.date();

    FarmCatalog {
        crops: crops(),
        fields: fields(),
        workers: workers(),
        attendance: vec![
            AttendanceRecord {
                id: "A1".into(),
                worker_id: "W1".into(),
                check_in: at(today, 8, 2),
                check_out: Some(at(today, 17, 5)),
                task: "Tomato planting".into(),
            },
            AttendanceRecord {
                id: "A2".into(),
                worker_id: "W2".into(),
                check_in: at(today, 8, 5),
                check_out: None,
                task: "Corn field prep".into(),
            },
        ],
        pesticides: pesticides(today),
        forecast: forecast(today),
        yields: [("2021", 4.0), ("2022", 3.0), ("2023", 5.0), ("2024", 4.5)]
            .into_iter()
            .map(|(season, yield_tonnes)| YieldPoint {
                season: season.to_owned(),
                yield_tonnes,
            })
            .collect(),
        costs: [
            ("Jan", 400.0, 240.0),
            ("Feb", 300.0, 139.0),
            ("Mar", 200.0, 980.0),
            ("Apr", 278.0, 390.0),
            ("May", 189.0, 480.0),
            ("Jun", 239.0, 380.0),
        ]
        .into_iter()
        .map(|(month, cost, output)| CostPoint {
            month: month.to_owned(),
            cost,
            output,
        })
        .collect(),
    }
}

/// Opens a new attendance record for the worker.
pub fn check_in(
    catalog: &mut FarmCatalog,
    worker_id: &str,
    now: NaiveDateTime,
) -> Result<(), AttendanceError> {
    if catalog.worker(worker_id).is_none() {
        return Err(AttendanceError::UnknownWorker(worker_id.to_owned()));
    }
    if catalog.is_checked_in(worker_id) {
        return Err(AttendanceError::AlreadyCheckedIn(worker_id.to_owned()));
    }

    let id = format!("A{}", catalog.attendance.len() + 1);
    catalog.attendance.push(AttendanceRecord {
        id,
        worker_id: worker_id.to_owned(),
        check_in: now,
        check_out: None,
        task: "General Duties".into(),
    });
    Ok(())
}

/// Closes the open attendance record of the worker.
pub fn check_out(
    catalog: &mut FarmCatalog,
    worker_id: &str,
    now: NaiveDateTime,
) -> Result<(), AttendanceError> {
    if catalog.worker(worker_id).is_none() {
        return Err(AttendanceError::UnknownWorker(worker_id.to_owned()));
    }

    let record = catalog
        .attendance
        .iter_mut()
        .find(|record| record.worker_id == worker_id && record.check_out.is_none())
        .ok_or_else(|| AttendanceError::NotCheckedIn(worker_id.to_owned()))?;
    record.check_out = Some(now);
    Ok(())
}
