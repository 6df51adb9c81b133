//! Canned PLACES API payloads.
//!
//! Rows are shaped like the Socrata county dataset: every value is a
//! string, and metadata columns the client ignores are present.

use serde_json::{json, Value};

/// Build one county row
pub fn county_row(
    year: &str,
    state: &str,
    location_id: &str,
    category_id: &str,
    measure_id: &str,
    short_name: &str,
    value: Option<&str>,
) -> Value {
    let category = match category_id {
        "HLTHOUT" => "Health Outcomes",
        "RISKBEH" => "Health Risk Behaviors",
        "PREVENT" => "Prevention",
        "DISABLT" => "Disability",
        _ => "Health Status",
    };

    let mut row = json!({
        ":id": format!("row-{}-{}", location_id, measure_id),
        ":version": "rv-1",
        "year": year,
        "stateabbr": state,
        "statedesc": "Wisconsin",
        "locationname": format!("County {}", location_id),
        "datasource": "BRFSS",
        "category": category,
        "measure": format!("{} among adults", short_name),
        "data_value_unit": "%",
        "data_value_type": "Age-adjusted prevalence",
        "totalpopulation": "50000",
        "locationid": location_id,
        "categoryid": category_id,
        "measureid": measure_id,
        "datavaluetypeid": "AgeAdjPrv",
        "short_question_text": short_name
    });

    if let Some(value) = value {
        row["data_value"] = json!(value);
        row["low_confidence_limit"] = json!("1.0");
        row["high_confidence_limit"] = json!("99.0");
    } else {
        row["data_value_footnote_symbol"] = json!("*");
        row["data_value_footnote"] = json!("Estimates suppressed for population less than 50");
    }

    row
}

/// Obesity and binge drinking values per county: (county, obesity, binge)
pub const COUNTY_VALUES: [(&str, &str, &str); 4] = [
    ("55001", "30.0", "20.0"),
    ("55003", "35.0", "22.0"),
    ("55005", "40.0", "25.0"),
    ("55007", "33.0", "21.0"),
];

/// A small 2021 release: two allowed categories, two other categories, one suppressed row
pub fn release_2021() -> Value {
    let mut rows = Vec::new();
    for (county, obesity, binge) in COUNTY_VALUES {
        rows.push(county_row(
            "2021",
            "WI",
            county,
            "HLTHOUT",
            "OBESITY",
            "Obesity",
            Some(obesity),
        ));
        rows.push(county_row(
            "2021",
            "WI",
            county,
            "RISKBEH",
            "BINGE",
            "Binge Drinking",
            Some(binge),
        ));
        rows.push(county_row(
            "2021",
            "WI",
            county,
            "PREVENT",
            "ACCESS2",
            "Health Insurance",
            Some("10.0"),
        ));
        rows.push(county_row(
            "2021",
            "WI",
            county,
            "DISABLT",
            "MOBILITY",
            "Mobility Disability",
            Some("12.0"),
        ));
    }
    rows.push(county_row(
        "2021",
        "WI",
        "55009",
        "HLTHOUT",
        "OBESITY",
        "Obesity",
        None,
    ));
    Value::Array(rows)
}

/// A data dictionary payload covering allowed and other categories
pub fn data_dictionary() -> Value {
    json!([
        {
            "measureid": "OBESITY",
            "measure_short_name": "Obesity",
            "measure_full_name": "Obesity among adults",
            "category_name": "Health Outcomes",
            "categoryid": "HLTHOUT"
        },
        {
            "measureid": "BINGE",
            "measure_short_name": "Binge Drinking",
            "measure_full_name": "Binge drinking among adults",
            "category_name": "Health Risk Behaviors",
            "categoryid": "RISKBEH"
        },
        {
            "measureid": "ACCESS2",
            "measure_short_name": "Health Insurance",
            "measure_full_name": "Current lack of health insurance among adults aged 18-64 years",
            "category_name": "Prevention",
            "categoryid": "PREVENT"
        }
    ])
}
