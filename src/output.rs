use tabled::{settings::Style, Table, Tabled};

/// Render a summary table to the console with the shared markdown style.
pub fn render_table<T>(title: &str, rows: &[T])
where
    T: Tabled + Clone,
{
    println!("##### {}\n", title);
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(rows.to_vec()).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// Same as `render_table` but capped; long tables (one row per courier)
/// would otherwise drown the console.
pub fn render_table_head<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("##### {}\n", title);
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}", table_str);
    if rows.len() > max_rows {
        println!("(showing first {} of {} rows)", max_rows, rows.len());
    }
    println!();
}

/// Section heading separating the dashboard views.
pub fn section(title: &str) {
    println!("== {} ==\n", title);
}
