use rowforge_core::{Dataset, Value};

/// Render one multi-row `INSERT` statement per non-empty table.
pub fn render_sql(data: &Dataset) -> String {
    let mut out = String::new();
    for table in &data.tables {
        let Some(first) = table.rows.first() else {
            continue;
        };

        let columns: Vec<String> = first.keys().map(quote_ident).collect();
        out.push_str(&format!(
            "INSERT INTO {} ({}) VALUES\n",
            quote_ident(&table.name),
            columns.join(", ")
        ));

        let tuples: Vec<String> = table
            .rows
            .iter()
            .map(|row| {
                let literals: Vec<String> =
                    row.iter().map(|(_, value)| sql_literal(value)).collect();
                format!("  ({})", literals.join(", "))
            })
            .collect();
        out.push_str(&tuples.join(",\n"));
        out.push_str(";\n\n");
    }
    out
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Int(value) => value.to_string(),
        Value::Float(value) => value.to_string(),
        Value::Text(value) => format!("'{}'", value.replace('\'', "''")),
    }
}
