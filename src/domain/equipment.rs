// domain/equipment.rs
use crate::domain::reading::parse_reading;
use crate::identity::VehicleIdentity;
use crate::table::{self, ColumnSpec, HeaderMode, RawTable, SchemaError, Table, TableRow, TableSchema};
use serde::Serialize;
use tracing::info;

pub const BRANCH: &str = "branch";
pub const SERIES: &str = "series";
pub const CHASSIS: &str = "chassis";
pub const HOUR_METER: &str = "hour_meter";
pub const BRAND: &str = "brand";
pub const MODEL: &str = "model";
pub const TYPE: &str = "type";
pub const PLATE: &str = "plate";
pub const SITUATION: &str = "situation";
pub const LEASE_VALUE: &str = "lease_value";
pub const GROUP: &str = "group";
pub const SUBGROUP: &str = "subgroup";
pub const OBSERVATIONS: &str = "observations";
pub const NICKNAME: &str = "nickname";
pub const OWNER: &str = "owner";

/// Registry sheet columns. Aliases cover the headers used by the rental
/// registry export ("Placa:", "Chassis:", "Localização/Filial Atual*:", ...).
pub fn registry_schema() -> TableSchema {
    TableSchema {
        table: "registry",
        columns: vec![
            ColumnSpec::required(BRANCH, &["Localização/Filial Atual", "Filial", "Localização"]),
            ColumnSpec::required(SERIES, &["Série", "Serie"]),
            ColumnSpec::required(CHASSIS, &["Chassis", "Chassi"]),
            ColumnSpec::required(
                HOUR_METER,
                &["Horímetro", "Horimetro", "Odômetro/Horímetro", "Hodômetro/Horímetro"],
            ),
            ColumnSpec::required(BRAND, &["Marca"]),
            ColumnSpec::required(MODEL, &["Modelo"]),
            ColumnSpec::required(TYPE, &["Tipo"]),
            ColumnSpec::required(PLATE, &["Placa"]),
            ColumnSpec::required(SITUATION, &["Situação", "Situacao", "Status"]),
            ColumnSpec::optional(LEASE_VALUE, &["Valor Locação", "Valor da Locação", "Valor Locacao"]),
            ColumnSpec::required(GROUP, &["Grupo"]),
            ColumnSpec::required(SUBGROUP, &["Subgrupo"]),
            ColumnSpec::optional(OBSERVATIONS, &["Observações", "Observacoes", "Obs"]),
            ColumnSpec::required(NICKNAME, &["Apelido"]),
            ColumnSpec::optional(OWNER, &["Proprietário ou Locador", "Proprietário", "Locador", "Cliente"]),
        ],
        header_offset: 0,
        header_mode: HeaderMode::Named,
        skip_data_rows: 0,
    }
}

/// One registry row. Never mutated after loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EquipmentRecord {
    /// 1-based row in the uploaded sheet.
    pub row: usize,
    pub branch: Option<String>,
    pub series: Option<String>,
    pub chassis: Option<String>,
    pub hour_meter: Option<f64>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
    pub plate: Option<String>,
    pub situation: Option<String>,
    pub lease_value: Option<f64>,
    pub group: Option<String>,
    pub subgroup: Option<String>,
    pub observations: Option<String>,
    pub nickname: Option<String>,
    pub owner: Option<String>,
}

impl EquipmentRecord {
    pub fn from_row(table: &Table, row: &TableRow) -> Self {
        let text = |column: &str| table.get(row, column).map(str::to_string);
        let number = |column: &str| table.get(row, column).and_then(parse_reading);

        Self {
            row: row.number,
            branch: text(BRANCH),
            series: text(SERIES),
            chassis: text(CHASSIS),
            hour_meter: number(HOUR_METER),
            brand: text(BRAND),
            model: text(MODEL),
            equipment_type: text(TYPE),
            plate: text(PLATE),
            situation: text(SITUATION),
            lease_value: number(LEASE_VALUE),
            group: text(GROUP),
            subgroup: text(SUBGROUP),
            observations: text(OBSERVATIONS),
            nickname: text(NICKNAME),
            owner: text(OWNER),
        }
    }

    pub fn identity(&self) -> VehicleIdentity {
        VehicleIdentity::from_fields(
            self.plate.as_deref(),
            self.nickname.as_deref(),
            self.chassis.as_deref(),
        )
    }
}

/// The loaded registry. Read-only for the rest of a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    pub records: Vec<EquipmentRecord>,
    /// Headers present in the upload that no registry column claims.
    pub unknown_columns: Vec<String>,
}

impl Registry {
    pub fn load(raw: &RawTable) -> Result<Self, SchemaError> {
        let table = table::load(raw, &registry_schema())?;

        let records: Vec<EquipmentRecord> = table
            .rows()
            .iter()
            .map(|row| EquipmentRecord::from_row(&table, row))
            .collect();

        let unmatchable = records.iter().filter(|r| !r.identity().is_matchable()).count();
        let unknown_columns = table.unknown_columns();

        info!(
            rows = records.len(),
            unmatchable,
            unknown_columns = unknown_columns.len(),
            "registry loaded"
        );

        Ok(Self {
            records,
            unknown_columns,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
