// telemetry/models.rs
use crate::domain::reading::parse_reading;
use crate::domain::{TelemetryEntry, TelemetryRecord};
use crate::telemetry::TelemetryError;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

// [
//   {
//     "placa": "RDT-0A85",
//     "ignicao": "1",
//     "velocidade": 0,
//     "odometro": "15234.7",
//     "horimetro": 3120.5,
//     "latitude": -23.55,
//     "longitude": -46.63,
//     "ultima_atualizacao": "2024-05-02 14:03:11"
//   },
//   ...
// ]

/// Trackers send numbers as JSON numbers or as strings, depending on firmware.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl Scalar {
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            Scalar::Text(s) => s.trim().to_string(),
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Scalar::Number(n) => n.to_string(),
            Scalar::Flag(b) => b.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    pub fn as_reading(&self, field: &str) -> Result<Option<f64>, String> {
        match self {
            Scalar::Number(n) => Ok(Some(*n)),
            Scalar::Text(s) if s.trim().is_empty() => Ok(None),
            Scalar::Text(s) => parse_reading(s)
                .map(Some)
                .ok_or_else(|| format!("field `{field}` is not numeric: {s:?}")),
            Scalar::Flag(_) => Err(format!("field `{field}` is a boolean")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeedEntry {
    pub placa: Option<Scalar>,
    pub ignicao: Option<Scalar>,
    pub velocidade: Option<Scalar>,
    pub odometro: Option<Scalar>,
    pub horimetro: Option<Scalar>,
    pub latitude: Option<Scalar>,
    pub longitude: Option<Scalar>,
    #[serde(alias = "data_atualizacao")]
    pub ultima_atualizacao: Option<Scalar>,
}

impl FeedEntry {
    fn into_entry(self) -> TelemetryEntry {
        let plate = self.placa.as_ref().and_then(Scalar::as_text);

        match self.to_record(plate.clone()) {
            Ok(record) => TelemetryEntry::Valid(record),
            Err(reason) => TelemetryEntry::Malformed { plate, reason },
        }
    }

    fn to_record(&self, plate: Option<String>) -> Result<TelemetryRecord, String> {
        let reading = |value: &Option<Scalar>, field: &str| match value {
            Some(v) => v.as_reading(field),
            None => Ok(None),
        };

        // Only an absent or null `ignicao` is malformed; a blank one is a value.
        let ignition = self
            .ignicao
            .as_ref()
            .map(|v| v.as_text().unwrap_or_default())
            .ok_or_else(|| "missing field `ignicao`".to_string())?;

        Ok(TelemetryRecord {
            plate,
            ignition: Some(ignition),
            speed: reading(&self.velocidade, "velocidade")?,
            odometer: reading(&self.odometro, "odometro")?,
            engine_hours: reading(&self.horimetro, "horimetro")?,
            latitude: reading(&self.latitude, "latitude")?,
            longitude: reading(&self.longitude, "longitude")?,
            last_update: self.ultima_atualizacao.as_ref().and_then(Scalar::as_text),
            ..TelemetryRecord::default()
        })
    }
}

/// Decode a feed body.
///
/// The body as a whole must be a JSON array; anything else is an error and no
/// entries are returned. Inside the array, an element that can't be tied to a
/// plate is skipped, and one that has a plate but bad fields is kept as
/// `TelemetryEntry::Malformed` so only its own row is affected.
pub fn decode_feed(body: &str) -> Result<Vec<TelemetryEntry>, TelemetryError> {
    let data: Value =
        serde_json::from_str(body).map_err(|e| TelemetryError::JsonParse(e.to_string()))?;

    let arr = data
        .as_array()
        .ok_or_else(|| TelemetryError::UnexpectedShape(format!("expected a list, got {}", kind(&data))))?;

    let mut entries = Vec::with_capacity(arr.len());
    let mut skipped = 0;

    for (i, v) in arr.iter().enumerate() {
        let entry = match serde_json::from_value::<FeedEntry>(v.clone()) {
            Ok(raw) => raw.into_entry(),
            Err(e) => TelemetryEntry::Malformed {
                plate: v
                    .get("placa")
                    .and_then(|p| serde_json::from_value::<Scalar>(p.clone()).ok())
                    .and_then(|p| p.as_text()),
                reason: e.to_string(),
            },
        };

        if entry.plate_key().is_empty() {
            skipped += 1;
            debug!(index = i, "feed element without a usable plate, skipped");
            continue;
        }

        entries.push(entry);
    }

    if skipped > 0 {
        warn!(skipped, kept = entries.len(), "feed elements without plate were dropped");
    }

    Ok(entries)
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
