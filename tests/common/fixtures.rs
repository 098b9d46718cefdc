use serde_json::{Value, json};

/// A complete `pv_case` record covering every section of the built-in mapping.
pub fn full_case() -> Value {
    json!({
        "pv_case": {
            "identifier": "CASE-2024-001",
            "narrative": "Patient developed a rash after starting treatment.",
            "literature": {
                "initial_receipt_date": "2024-01-15T09:30:00Z",
                "latest_receipt_date": "2024-02-01",
                "author": {
                    "name": "Dr. A. Reporter",
                    "author_organizations": [
                        { "organization": { "title": "General Hospital", "department": "Dermatology" } }
                    ]
                }
            },
            "patient": {
                "identifier": "PT-7",
                "age": 54,
                "age_units": "a",
                "weight": 72.5,
                "height": 180,
                "gender": "Male"
            },
            "conditions": [
                { "meddra_version": "26.0", "meddra_code": "10020772", "start_date": "2010-05-01", "comments": "Hypertension" }
            ],
            "events": [
                {
                    "identifier": "EV-1",
                    "description": "Rash on both arms",
                    "meddra_term": "Rash",
                    "meddra_version": "26.0",
                    "meddra_code": "10037844",
                    "seriousness_type": "serious",
                    "start_date": "2024-01-10",
                    "end_date": "2024-01-20",
                    "outcome": { "name": "Recovered" }
                },
                {
                    "identifier": "EV-2",
                    "meddra_term": "Headache",
                    "start_date": "2024-01-12",
                    "outcome": { "name": "something else" }
                }
            ],
            "diagnostic_tests": [
                {
                    "identifier": "T-1",
                    "date_of_test": "2024-01-11",
                    "meddra_term": "Blood pressure",
                    "test_results": "140",
                    "test_units": "mm[Hg]"
                }
            ],
            "drugs": [
                {
                    "identifier": "DR-1",
                    "name": "Drug A",
                    "role": "Suspect",
                    "action_taken": "Permanently discontinued",
                    "dosages": [
                        { "dose": 10, "dose_units": "mg", "start_date": "2024-01-01", "route_of_administration": "Oral" },
                        { "dose": 20, "dose_units": "mg", "start_date": "2024-01-05", "end_date": "2024-01-10", "route_of_administration": "Nasal" }
                    ]
                },
                {
                    "identifier": "DR-2",
                    "name": "Drug B",
                    "role": "Concomitant",
                    "dosages": [
                        { "dose": 1, "dose_units": "g", "route_of_administration": "intravenous" }
                    ]
                }
            ]
        }
    })
}

/// The smallest record that produces output: only the case identifier.
pub fn identifier_only_case(identifier: &str) -> Value {
    json!({ "pv_case": { "identifier": identifier } })
}

/// Wraps a record the way queue exports deliver it.
pub fn enveloped(record: Value) -> Value {
    json!({ "input_json": { "data": record } })
}

/// A two-level schema whose `A.1` and `A.7` fields write the same element.
pub const CLASHING_SCHEMA: &str = r#"{
    "name": "clash",
    "version": "1",
    "skeleton": { "name": "doc", "anchor": "root" },
    "groups": [
        { "tag": "A", "anchor": "root", "chain": [{ "name": "a" }] }
    ],
    "fields": [
        { "tag": "A.1", "host": [{ "name": "v" }], "slot": "shared" },
        { "tag": "A.7", "host": [{ "name": "v" }], "slot": "shared" }
    ]
}"#;

pub const CLASHING_MAPPING: &str = "tag,source_path\nA.1,first\nA.7,second\n";
