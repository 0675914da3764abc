use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::MySqlPool;

/// Typed value for runtime-built UPDATE statements.
#[derive(Debug, PartialEq)]
pub enum SqlArg {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

#[derive(Debug)]
pub struct Patch {
    pub sql: String,
    pub args: Vec<SqlArg>,
}

/// Builds a partial UPDATE from a JSON object, accepting only whitelisted
/// columns. Unknown keys are a 400, not silently dropped: a typo in a client
/// payload should fail loudly instead of editing nothing.
pub fn build_patch(
    table: &str,
    allowed: &[&str],
    payload: &Value,
    id_column: &str,
    id_value: u64,
) -> Result<Patch, actix_web::Error> {
    let fields = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if fields.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    let mut set_clauses = Vec::with_capacity(fields.len());
    let mut args = Vec::with_capacity(fields.len() + 1);

    for (column, value) in fields {
        if !allowed.contains(&column.as_str()) {
            return Err(ErrorBadRequest(format!("Unknown column: {column}")));
        }
        set_clauses.push(format!("{column} = ?"));
        args.push(json_to_arg(value)?);
    }

    args.push(SqlArg::I64(id_value as i64));

    Ok(Patch {
        sql: format!(
            "UPDATE {} SET {} WHERE {} = ?",
            table,
            set_clauses.join(", "),
            id_column
        ),
        args,
    })
}

/// Date-looking strings bind as dates so MySQL compares them natively.
fn json_to_arg(value: &Value) -> Result<SqlArg, actix_web::Error> {
    match value {
        Value::String(s) => {
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(SqlArg::Date(d))
            } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                Ok(SqlArg::DateTime(dt))
            } else {
                Ok(SqlArg::String(s.clone()))
            }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SqlArg::I64(i))
            } else if let Some(f) = n.as_f64() {
                Ok(SqlArg::F64(f))
            } else {
                Err(ErrorBadRequest("Unsupported numeric value"))
            }
        }
        Value::Bool(b) => Ok(SqlArg::Bool(*b)),
        Value::Null => Ok(SqlArg::Null),
        _ => Err(ErrorBadRequest("Unsupported JSON value type")),
    }
}

pub async fn execute_patch(pool: &MySqlPool, patch: Patch) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&patch.sql);

    for arg in patch.args {
        query = match arg {
            SqlArg::String(v) => query.bind(v),
            SqlArg::I64(v) => query.bind(v),
            SqlArg::F64(v) => query.bind(v),
            SqlArg::Bool(v) => query.bind(v),
            SqlArg::Date(v) => query.bind(v),
            SqlArg::DateTime(v) => query.bind(v),
            SqlArg::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLS: &[&str] = &["first_name", "daily_rate", "hire_date", "exit_date"];

    #[test]
    fn builds_update_with_bound_id() {
        let patch = build_patch(
            "employees",
            COLS,
            &json!({"first_name": "Moussa", "daily_rate": 55.5}),
            "id",
            9,
        )
        .unwrap();

        assert_eq!(
            patch.sql,
            "UPDATE employees SET daily_rate = ?, first_name = ? WHERE id = ?"
        );
        assert_eq!(patch.args.len(), 3);
        assert_eq!(patch.args[2], SqlArg::I64(9));
    }

    #[test]
    fn date_strings_bind_as_dates() {
        let patch = build_patch("employees", COLS, &json!({"hire_date": "2026-01-05"}), "id", 1)
            .unwrap();
        assert!(matches!(patch.args[0], SqlArg::Date(_)));
    }

    #[test]
    fn null_clears_a_column() {
        let patch =
            build_patch("employees", COLS, &json!({"exit_date": null}), "id", 1).unwrap();
        assert_eq!(patch.args[0], SqlArg::Null);
    }

    #[test]
    fn unknown_column_is_rejected() {
        assert!(build_patch("employees", COLS, &json!({"statut": "Actif"}), "id", 1).is_err());
    }

    #[test]
    fn empty_or_non_object_payloads_are_rejected() {
        assert!(build_patch("employees", COLS, &json!({}), "id", 1).is_err());
        assert!(build_patch("employees", COLS, &json!(["a"]), "id", 1).is_err());
    }
}
