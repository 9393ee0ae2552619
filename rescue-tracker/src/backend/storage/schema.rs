//! Table layout for each animal kind.
//!
//! Both tables share the base columns; the kind-specific columns always come
//! last so inserts can bind the base fields first and the details afterwards.

use shared::AnimalKind;

/// Format used for the `acquisition_date` text column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQL statements for one kind's table
pub struct TableSchema {
    pub table: &'static str,
    pub create_table: &'static str,
    pub create_reserved_index: &'static str,
    pub select: &'static str,
    pub insert: &'static str,
    pub update: &'static str,
    pub set_reserved: &'static str,
}

static DOGS: TableSchema = TableSchema {
    table: "dogs",
    create_table: r#"
        CREATE TABLE IF NOT EXISTS dogs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            gender TEXT NOT NULL,
            age INTEGER NOT NULL CHECK (age >= 0),
            weight REAL NOT NULL CHECK (weight >= 0),
            acquisition_date TEXT NOT NULL,
            acquisition_country TEXT NOT NULL,
            training_status TEXT NOT NULL,
            reserved BOOLEAN NOT NULL DEFAULT 0,
            in_service_country TEXT NOT NULL,
            breed TEXT NOT NULL
        );
    "#,
    create_reserved_index: r#"
        CREATE INDEX IF NOT EXISTS idx_dogs_reserved
        ON dogs(reserved);
    "#,
    select: r#"
        SELECT id, name, gender, age, weight, acquisition_date, acquisition_country,
               training_status, reserved, in_service_country, breed
        FROM dogs
    "#,
    insert: r#"
        INSERT INTO dogs (name, gender, age, weight, acquisition_date, acquisition_country,
                          training_status, reserved, in_service_country, breed)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    "#,
    update: r#"
        UPDATE dogs
        SET age = ?, weight = ?, acquisition_date = ?, acquisition_country = ?,
            training_status = ?, in_service_country = ?, breed = ?
        WHERE name = ?
    "#,
    set_reserved: "UPDATE dogs SET reserved = ? WHERE id = ?",
};

static MONKEYS: TableSchema = TableSchema {
    table: "monkeys",
    create_table: r#"
        CREATE TABLE IF NOT EXISTS monkeys (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            gender TEXT NOT NULL,
            age INTEGER NOT NULL CHECK (age >= 0),
            weight REAL NOT NULL CHECK (weight >= 0),
            acquisition_date TEXT NOT NULL,
            acquisition_country TEXT NOT NULL,
            training_status TEXT NOT NULL,
            reserved BOOLEAN NOT NULL DEFAULT 0,
            in_service_country TEXT NOT NULL,
            species TEXT NOT NULL,
            tail_length REAL NOT NULL CHECK (tail_length >= 0),
            height REAL NOT NULL CHECK (height >= 0),
            body_length REAL NOT NULL CHECK (body_length >= 0)
        );
    "#,
    create_reserved_index: r#"
        CREATE INDEX IF NOT EXISTS idx_monkeys_reserved
        ON monkeys(reserved);
    "#,
    select: r#"
        SELECT id, name, gender, age, weight, acquisition_date, acquisition_country,
               training_status, reserved, in_service_country,
               species, tail_length, height, body_length
        FROM monkeys
    "#,
    insert: r#"
        INSERT INTO monkeys (name, gender, age, weight, acquisition_date, acquisition_country,
                             training_status, reserved, in_service_country,
                             species, tail_length, height, body_length)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    "#,
    update: r#"
        UPDATE monkeys
        SET age = ?, weight = ?, acquisition_date = ?, acquisition_country = ?,
            training_status = ?, in_service_country = ?,
            species = ?, tail_length = ?, height = ?, body_length = ?
        WHERE name = ?
    "#,
    set_reserved: "UPDATE monkeys SET reserved = ? WHERE id = ?",
};

/// Statements for the table holding `kind`
pub fn table_schema(kind: AnimalKind) -> &'static TableSchema {
    match kind {
        AnimalKind::Dog => &DOGS,
        AnimalKind::Monkey => &MONKEYS,
    }
}
