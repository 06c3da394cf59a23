use std::io::Write;

use memql::{Config, CsvSource, Database, Output, Value};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("In-Memory Query Engine Demo\n");

    // Write a small CSV file to load
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    writeln!(file, "name,age,department")?;
    writeln!(file, "Alice, 31 , Sales")?;
    writeln!(file, "Bob,25,Support")?;
    writeln!(file, "Charlie,,Sales")?;
    let path = file.path().display().to_string();

    let mut db = Database::new(CsvSource::new(&Config::default()));

    println!("{}", db.run(&format!("LOAD '{path}' AS staff"))?);
    println!();

    for sql in [
        "SELECT * FROM staff",
        "SELECT name FROM staff WHERE department = 'Sales'",
        "SELECT COUNT(age) FROM staff",
    ] {
        println!("{sql}");
        println!("{}\n", db.run(sql)?);
    }

    // Results can also be consumed as typed values
    if let Output::Rows(result) = db.run("SELECT name, age FROM staff WHERE age != NULL")? {
        for row in &result.rows {
            if let [Value::Text(name), Value::Int(age)] = row.as_slice() {
                println!("{name} is {age}");
            }
        }
    }

    // Errors carry the details needed to report them
    if let Err(e) = db.run("SELECT COUNT(*) FROM staff WHERE age = 'thirty'") {
        println!("\nerror: {e}");
    }

    println!("\nTables loaded:");
    for table_name in db.list_tables() {
        println!("  - {table_name}");
    }

    Ok(())
}
