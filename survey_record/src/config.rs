// ********* Input data structures ***********

use std::collections::HashMap;

use indexmap::IndexMap;

/// A decoded form submission: an ordered multimap from field name to the
/// values submitted under that name.
///
/// Whether a field is single- or multi-valued is a contract known by the
/// caller. The field name alone does not indicate cardinality.
///
/// ```
/// use survey_record::Submission;
///
/// let mut sub = Submission::new();
/// sub.push_value("clienti", "RFI");
/// sub.push_value("clienti", "Trenitalia");
///
/// assert_eq!(sub.first("clienti"), "RFI");
/// assert_eq!(sub.list("clienti").len(), 2);
/// assert_eq!(sub.first("hobby"), "");
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Submission {
    fields: HashMap<String, Vec<String>>,
}

impl Submission {
    pub fn new() -> Submission {
        Submission {
            fields: HashMap::new(),
        }
    }

    /// Appends one value under the given field name, preserving the order
    /// in which values were submitted.
    pub fn push_value(&mut self, name: &str, value: &str) {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// The first value submitted under the name, or the empty string.
    pub fn first(&self, name: &str) -> &str {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// All values submitted under the name, in submission order.
    /// A missing field yields an empty slice, never an error.
    pub fn list(&self, name: &str) -> &[String] {
        self.fields
            .get(name)
            .map(|values| values.as_slice())
            .unwrap_or(&[])
    }
}

// ******** Output data structures *********

/// The flattened, fixed-schema output of one full submission: an
/// insertion-ordered mapping from column name to cell text. The column
/// order is part of the artifact contract.
pub type Record = IndexMap<String, String>;

// ********* Schema configuration **********

// The field names and closed area sets below are the wire contract with the
// questionnaire front end and must match what it emits exactly, including
// the historical spellings.

/// Separator between attribute values inside one serialized experience
/// entry.
pub const ENTRY_VALUE_SEPARATOR: &str = " | ";

/// Separator between experience entries inside one area column.
pub const ENTRY_SEPARATOR: &str = "\n\n";

/// Separator for comma-joined multi-select values.
pub const LIST_SEPARATOR: &str = ", ";

/// How an area identifier is spelled inside the attribute field names
/// emitted by the form.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum AreaNaming {
    /// Display-cased identifiers, lowercased in field names
    /// (`Firmware` -> `linguaggi_firmware[]`).
    Lowercased,
    /// Identifiers used verbatim (`tecnologie_FAT[]`).
    Verbatim,
}

/// A named group of topic areas sharing one attribute schema and one
/// zipping rule.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SectionSpec {
    /// Section name as spelled in the summary column.
    pub name: &'static str,
    /// The multi-select field listing the areas the respondent selected.
    pub select_field: &'static str,
    /// The closed set of topic areas. Also the per-area column names.
    pub areas: &'static [&'static str],
    /// Attribute field prefixes, in entry serialization order.
    pub attributes: &'static [&'static str],
    pub naming: AreaNaming,
}

impl SectionSpec {
    /// Column name of the selected-areas summary for this section.
    pub fn summary_column(&self) -> String {
        format!("Aree progetti {}", self.name)
    }

    /// The form field holding one attribute list for one area.
    pub fn attribute_field(&self, attribute: &str, area: &str) -> String {
        match self.naming {
            AreaNaming::Lowercased => format!("{}_{}[]", attribute, area.to_lowercase()),
            AreaNaming::Verbatim => format!("{}_{}[]", attribute, area),
        }
    }
}

const TECH_ATTRIBUTES: &[&str] = &["tecnologie", "azienda", "durata", "descrizione"];
const MANAGEMENT_ATTRIBUTES: &[&str] = &["tool", "azienda", "durata", "descrizione"];

/// The seven questionnaire sections, in record-assembly order.
pub const SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        name: "Sviluppo",
        select_field: "sviluppo",
        areas: &["Applicativi", "Firmware", "Web", "Mobile", "Scada", "Plc"],
        // The capital A in `Ambito` is what the form emits.
        attributes: &["linguaggi", "tool", "Ambito", "durata", "descrizione"],
        naming: AreaNaming::Lowercased,
    },
    SectionSpec {
        name: "V&V",
        select_field: "v&v",
        areas: &[
            "functional_testing",
            "test_and_commisioning",
            "unit",
            "analisi_statica",
            "analisi_dinamica",
            "automatic_test",
            "piani_schematici",
            "procedure",
            "cablaggi",
            "FAT",
            "SAT",
            "doc",
        ],
        attributes: TECH_ATTRIBUTES,
        naming: AreaNaming::Verbatim,
    },
    SectionSpec {
        name: "Safety",
        select_field: "safety",
        areas: &[
            "RAMS",
            "hazard_analysis",
            "verification_report",
            "fire_safety",
            "reg_402",
        ],
        attributes: TECH_ATTRIBUTES,
        naming: AreaNaming::Verbatim,
    },
    SectionSpec {
        name: "System",
        select_field: "system",
        areas: &[
            "requirement_management",
            "requirement_engineering",
            "system_engineering",
            "project_engineering",
        ],
        attributes: TECH_ATTRIBUTES,
        naming: AreaNaming::Verbatim,
    },
    SectionSpec {
        name: "Segnalamento",
        select_field: "segnalamento",
        areas: &[
            "piani_schematici_segnalamento",
            "cfg_impianti",
            "layout_apparecchiature",
            "architettura_rete",
            "computo_metrico",
        ],
        attributes: TECH_ATTRIBUTES,
        naming: AreaNaming::Verbatim,
    },
    SectionSpec {
        name: "BIM",
        select_field: "bim",
        areas: &[
            "modellazione_e_digitalizzazione",
            "verifica_analisi_e_controllo_qualita",
            "gestione_coordinamento_e_simulazione",
            "visualizzazione_realtavirtuale_e_rendering",
        ],
        attributes: &["tool", "azienda", "durata", "descrizione", "certificazioni"],
        naming: AreaNaming::Verbatim,
    },
    SectionSpec {
        name: "Project Management",
        select_field: "pm",
        areas: &[
            "project_manager_office",
            "project_manager",
            "risk_manager",
            "resource_manager",
            "quality_manager",
            "communication_manager",
            "portfolio_manager",
            "program_manager",
            "team_leader",
            "business_analyst",
            "contract_back_office",
        ],
        attributes: MANAGEMENT_ATTRIBUTES,
        naming: AreaNaming::Verbatim,
    },
];

/// One scalar (top-level) column of the record.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScalarColumn {
    pub column: &'static str,
    pub field: &'static str,
    /// Multi-select fields are comma-joined into the column.
    pub multi: bool,
}

/// The scalar columns, in record order. The transient identifier column is
/// handled separately.
pub const SCALAR_COLUMNS: &[ScalarColumn] = &[
    ScalarColumn {
        column: "Nome",
        field: "nome",
        multi: false,
    },
    ScalarColumn {
        column: "Email",
        field: "email",
        multi: false,
    },
    ScalarColumn {
        column: "Istruzione",
        field: "istruzione",
        multi: false,
    },
    ScalarColumn {
        column: "Indirizzo di studio",
        field: "studi",
        multi: false,
    },
    ScalarColumn {
        column: "Sede Alten",
        field: "sede",
        multi: false,
    },
    ScalarColumn {
        column: "Esperienza (anni)",
        field: "esperienza",
        multi: false,
    },
    ScalarColumn {
        column: "Esperienza Alten (anni)",
        field: "esperienza_alten",
        multi: false,
    },
    ScalarColumn {
        column: "Certificazioni",
        field: "certificati",
        multi: false,
    },
    ScalarColumn {
        column: "Clienti Railway",
        field: "clienti",
        multi: true,
    },
    ScalarColumn {
        column: "Area Railway",
        field: "area_railway",
        multi: true,
    },
    ScalarColumn {
        column: "Normative",
        field: "normative",
        multi: false,
    },
    ScalarColumn {
        column: "Metodologie lavoro",
        field: "metodologia",
        multi: true,
    },
    ScalarColumn {
        column: "Sistemi Operativi",
        field: "SistemiOperativi",
        multi: false,
    },
    ScalarColumn {
        column: "Info aggiuntive",
        field: "altro",
        multi: false,
    },
    ScalarColumn {
        column: "Hobby",
        field: "hobby",
        multi: false,
    },
];
