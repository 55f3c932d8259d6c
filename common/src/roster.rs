//! Flatten the team roster into one spreadsheet row per participant.
//!
//! Every row carries the team's aggregate fields (scores, review marks and totals)
//! followed by the participant's own details. The team lead comes first, then each
//! member in the order the server lists them.

use crate::sheet::{Cell, Sheet};
use serde_json::{Map, Value};

pub const DEFAULT_OUTPUT: &str = "hackforge_roster.xlsx";

/// Suffix appended to a member's registration number to form their email.
pub const MEMBER_EMAIL_DOMAIN: &str = "klu.ac.in";

/// Review objects expanded into columns, with the total column for each.
/// The `Secound` spelling is what the registration server stores.
const REVIEWS: [(&str, &str); 2] = [
    ("FirstReview", "FirstReview_Total"),
    ("SecoundReview", "SecondReview_Total"),
];

pub type RosterRecord = Map<String, Value>;

fn text_field(object: &Map<String, Value>, key: &str) -> Value {
    object
        .get(key)
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}

fn number_field(object: &Map<String, Value>, key: &str) -> Value {
    object
        .get(key)
        .filter(|v| !v.is_null())
        .cloned()
        .unwrap_or_else(|| Value::from(0))
}

/// Add two JSON numbers, keeping integers as integers.
fn add_marks(total: &Value, marks: &Value) -> Value {
    match (total.as_i64(), marks.as_i64()) {
        (Some(a), Some(b)) => Value::from(a + b),
        _ => Value::from(total.as_f64().unwrap_or(0.0) + marks.as_f64().unwrap_or(0.0)),
    }
}

/// The fields shared by every row of one team.
#[must_use]
pub fn team_record(team: &Map<String, Value>) -> RosterRecord {
    let mut record = RosterRecord::new();
    record.insert("Team Name".into(), text_field(team, "teamname"));
    record.insert("Domain".into(), text_field(team, "Domain"));
    record.insert("Score".into(), number_field(team, "Score"));
    record.insert(
        "First Review Score".into(),
        number_field(team, "FirstReviewScore"),
    );
    record.insert(
        "Second Review Score".into(),
        number_field(team, "SecoundReviewScore"),
    );
    record.insert("Password".into(), text_field(team, "password"));

    let mut grand_total = Value::from(0);
    for (review, total_column) in REVIEWS {
        let mut total = Value::from(0);
        if let Some(Value::Object(criteria)) = team.get(review) {
            for (key, entry) in criteria {
                let column = format!("{review}_{key}");
                match entry.get("marks") {
                    Some(marks) => {
                        if marks.is_number() {
                            total = add_marks(&total, marks);
                        }
                        record.insert(column, marks.clone());
                    }
                    None => {
                        record.insert(column, entry.clone());
                    }
                }
            }
        }
        grand_total = add_marks(&grand_total, &total);
        record.insert(total_column.into(), total);
    }
    record.insert("Grand_Total".into(), grand_total);

    record
}

fn lead_record(team: &Map<String, Value>, base: &RosterRecord) -> RosterRecord {
    let mut record = base.clone();
    record.insert("Name".into(), text_field(team, "name"));
    record.insert("Email".into(), text_field(team, "email"));
    record.insert(
        "Registration Number".into(),
        text_field(team, "registrationNumber"),
    );
    record.insert("Role".into(), Value::from("Team Lead"));
    record.insert("Sector".into(), text_field(team, "Sector"));
    record.insert("Department".into(), text_field(team, "department"));
    record.insert("Year".into(), text_field(team, "year"));
    record.insert("Section".into(), text_field(team, "section"));
    record.insert("Hostel".into(), text_field(team, "type"));
    record.insert("Room".into(), text_field(team, "room"));
    record
}

fn member_record(
    team: &Map<String, Value>,
    member: &Map<String, Value>,
    base: &RosterRecord,
) -> RosterRecord {
    let registration = match text_field(member, "registrationNumber") {
        Value::String(s) => s,
        other => other.to_string(),
    };
    let mut record = base.clone();
    record.insert("Name".into(), text_field(member, "name"));
    record.insert(
        "Email".into(),
        Value::from(format!("{registration}@{MEMBER_EMAIL_DOMAIN}")),
    );
    record.insert("Registration Number".into(), Value::from(registration));
    record.insert("Role".into(), Value::from("Team Member"));
    record.insert("Sector".into(), text_field(team, "Sector"));
    record.insert("Department".into(), text_field(member, "department"));
    record.insert("Year".into(), text_field(member, "year"));
    record.insert("Section".into(), text_field(member, "section"));
    record.insert("Hostel".into(), text_field(member, "type"));
    record.insert("Room".into(), text_field(member, "room"));
    record
}

/// One record for each lead and each member of every team.
#[must_use]
pub fn flatten_roster(teams: &[Map<String, Value>]) -> Vec<RosterRecord> {
    let mut records = Vec::new();
    for team in teams {
        let base = team_record(team);
        records.push(lead_record(team, &base));
        if let Some(Value::Array(members)) = team.get("teamMembers") {
            for member in members.iter().filter_map(Value::as_object) {
                records.push(member_record(team, member, &base));
            }
        }
    }
    records
}

fn to_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => n.as_f64().map_or(Cell::Empty, Cell::Number),
        Value::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

/// Lay the records out as a sheet. Columns are every key seen, in first-seen order;
/// a record without a column gets a blank cell.
#[must_use]
pub fn roster_sheet(records: &[RosterRecord]) -> Sheet {
    let mut header: Vec<String> = Vec::new();
    for key in records.iter().flat_map(Map::keys) {
        if !header.contains(key) {
            header.push(key.clone());
        }
    }

    let mut sheet = Sheet::new("Roster", header);
    for record in records {
        let row = sheet
            .header
            .iter()
            .map(|column| record.get(column).map_or(Cell::Empty, to_cell))
            .collect();
        sheet.rows.push(row);
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_team() -> Map<String, Value> {
        let value = json!({
            "teamname": "Null Pointers",
            "name": "Asha",
            "email": "asha@example.com",
            "registrationNumber": "9921004001",
            "department": "CSE",
            "year": "III",
            "section": "A",
            "type": "Hosteller",
            "room": "B-204",
            "Domain": "Healthcare",
            "Sector": "Naruto",
            "password": "p4ss",
            "FirstReviewScore": 18,
            "FirstReview": {
                "innovation": { "marks": 8 },
                "feasibility": { "marks": 7 },
                "remarks": "solid"
            },
            "SecoundReview": {
                "demo": { "marks": 9.5 }
            },
            "teamMembers": [
                {
                    "name": "Ravi",
                    "registrationNumber": "9921004002",
                    "department": "ECE",
                    "year": "II",
                    "section": "B",
                    "type": "Dayscholar",
                    "room": ""
                },
                "not a member object"
            ]
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_team_record_totals() {
        let record = team_record(&sample_team());

        assert_eq!(record["Team Name"], "Null Pointers");
        assert_eq!(record["Score"], 0);
        assert_eq!(record["First Review Score"], 18);
        assert_eq!(record["Second Review Score"], 0);
        assert_eq!(record["FirstReview_innovation"], 8);
        assert_eq!(record["FirstReview_remarks"], "solid");
        assert_eq!(record["SecoundReview_demo"], 9.5);
        assert_eq!(record["FirstReview_Total"], 15);
        assert_eq!(record["SecondReview_Total"], 9.5);
        assert_eq!(record["Grand_Total"], 24.5);

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(
            keys[..6],
            [
                "Team Name",
                "Domain",
                "Score",
                "First Review Score",
                "Second Review Score",
                "Password"
            ]
        );
        assert_eq!(keys[6], "FirstReview_innovation");
        assert_eq!(keys.last(), Some(&"Grand_Total"));
    }

    #[test]
    fn test_flatten_roster_lead_and_members() {
        let records = flatten_roster(&[sample_team()]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Role"], "Team Lead");
        assert_eq!(records[0]["Email"], "asha@example.com");
        assert_eq!(records[0]["Hostel"], "Hosteller");
        assert_eq!(records[1]["Role"], "Team Member");
        assert_eq!(records[1]["Name"], "Ravi");
        assert_eq!(records[1]["Email"], "9921004002@klu.ac.in");
        assert_eq!(records[1]["Sector"], "Naruto");
        assert_eq!(records[1]["Grand_Total"], 24.5);
    }

    #[test]
    fn test_flatten_roster_missing_fields() {
        let team = match json!({ "teamname": "Solo" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let records = flatten_roster(&[team]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Domain"], "");
        assert_eq!(records[0]["Grand_Total"], 0);
        assert_eq!(records[0]["Sector"], "");
    }

    #[test]
    fn test_roster_sheet_union_of_columns() {
        let plain = match json!({ "teamname": "Plain" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let records = flatten_roster(&[plain, sample_team()]);
        let sheet = roster_sheet(&records);

        assert_eq!(sheet.rows.len(), 3);
        let innovation = sheet.column_index("FirstReview_innovation").unwrap();
        // the review column comes after every column of the first record
        assert!(innovation > sheet.column_index("Room").unwrap());
        assert_eq!(sheet.cell(0, innovation), &Cell::Empty);
        assert_eq!(sheet.cell(1, innovation), &Cell::Number(8.0));
        let role = sheet.column_index("Role").unwrap();
        assert_eq!(sheet.cell(2, role), &Cell::text("Team Member"));
    }
}
