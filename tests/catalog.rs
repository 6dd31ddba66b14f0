mod common;

use common::{Harness, init_logging};
use primersql::{Engine, ErrorKind, QueryResult, Value};

#[test]
fn test_database_lifecycle() {
    init_logging();
    let mut engine = Engine::new();
    let mut session = engine.session();

    let err = engine
        .execute(&mut session, "CREATE TABLE t (id INT)")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoDatabaseSelected);

    engine.execute(&mut session, "CREATE DATABASE shop").unwrap();
    let err = engine.execute(&mut session, "CREATE DATABASE shop").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateDatabase);
    engine
        .execute(&mut session, "CREATE DATABASE IF NOT EXISTS shop")
        .unwrap();

    let err = engine.execute(&mut session, "USE nowhere").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSuchDatabase);

    engine.execute(&mut session, "USE shop").unwrap();
    engine.execute(&mut session, "CREATE TABLE t (id INT)").unwrap();
    assert_eq!(session.current_database(), Some("shop"));

    engine.execute(&mut session, "DROP DATABASE shop").unwrap();
    assert_eq!(session.current_database(), None);
    let QueryResult::Rows(set) = engine.execute(&mut session, "SELECT DATABASE()").unwrap() else {
        panic!("expected rows");
    };
    assert_eq!(set.rows[0][0], Value::Null);

    let err = engine.execute(&mut session, "DROP DATABASE shop").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSuchDatabase);
    engine
        .execute(&mut session, "DROP DATABASE IF EXISTS shop")
        .unwrap();
}

#[test]
fn test_show_and_describe() {
    let mut h = Harness::new();
    h.script(&[
        "CREATE DATABASE archive",
        "CREATE TABLE tweets (id INT PRIMARY KEY AUTO_INCREMENT, username VARCHAR(15) NOT NULL DEFAULT 'anon', content VARCHAR(140))",
        "CREATE TABLE accounts (id INT)",
    ]);

    assert_eq!(h.column("SHOW DATABASES"), vec!["archive", "test"]);

    let tables = h.query("SHOW TABLES");
    assert_eq!(tables.columns, vec!["Tables_in_test"]);
    assert_eq!(h.column("SHOW TABLES"), vec!["accounts", "tweets"]);

    let desc = h.query("DESC tweets");
    assert_eq!(desc.columns, vec!["Field", "Type", "Null", "Key", "Default", "Extra"]);
    assert_eq!(
        desc.rows[1],
        vec![
            Value::from("username"),
            Value::from("varchar(15)"),
            Value::from("NO"),
            Value::from(""),
            Value::from("anon"),
            Value::from(""),
        ]
    );
    assert_eq!(desc, h.query("SHOW COLUMNS FROM tweets"));
    assert_eq!(
        h.try_run("DESCRIBE nothing").unwrap_err().kind(),
        ErrorKind::NoSuchTable
    );
}

#[test]
fn test_names_are_scoped_per_database() {
    let mut h = Harness::new();
    h.script(&[
        "CREATE TABLE pets (name VARCHAR(20))",
        "INSERT INTO pets VALUES ('Blue')",
        "CREATE DATABASE other",
        "USE other",
        "CREATE TABLE pets (name VARCHAR(20))",
    ]);
    assert!(h.query("SELECT * FROM pets").rows.is_empty());

    h.run("USE test");
    assert_eq!(h.column("SELECT name FROM pets"), vec!["Blue"]);
    // table names are case-sensitive, column names are not
    assert_eq!(h.try_run("SELECT * FROM Pets").unwrap_err().kind(), ErrorKind::NoSuchTable);
    assert_eq!(h.column("SELECT NAME FROM pets"), vec!["Blue"]);
}

#[test]
fn test_create_table_validation() {
    let mut h = Harness::new();
    let cases = [
        ("CREATE TABLE a (id INT, ID TEXT)", ErrorKind::InvalidSchema),
        ("CREATE TABLE a (id INT PRIMARY KEY, n INT PRIMARY KEY)", ErrorKind::InvalidSchema),
        ("CREATE TABLE a (id INT PRIMARY KEY, n INT, PRIMARY KEY (n))", ErrorKind::InvalidSchema),
        ("CREATE TABLE a (id INT, PRIMARY KEY (missing))", ErrorKind::InvalidSchema),
        ("CREATE TABLE a (id INT AUTO_INCREMENT)", ErrorKind::InvalidSchema),
        ("CREATE TABLE a (name TEXT PRIMARY KEY AUTO_INCREMENT)", ErrorKind::InvalidSchema),
        ("CREATE TABLE a (n INT DEFAULT 'x')", ErrorKind::InvalidSchema),
        ("CREATE TABLE a (n INT NOT NULL DEFAULT NULL)", ErrorKind::InvalidSchema),
        ("CREATE TABLE a (n DECIMAL(2,5))", ErrorKind::InvalidSchema),
    ];
    for (sql, kind) in cases {
        assert_eq!(h.try_run(sql).unwrap_err().kind(), kind, "{sql}");
    }
    assert!(h.column("SHOW TABLES").is_empty());

    h.run("CREATE TABLE a (id INT)");
    assert_eq!(
        h.try_run("CREATE TABLE a (id INT)").unwrap_err().kind(),
        ErrorKind::DuplicateTable
    );
    h.run("CREATE TABLE IF NOT EXISTS a (other INT)");
    assert_eq!(h.query("DESC a").rows.len(), 1);
}

#[test]
fn test_composite_primary_key() {
    let mut h = Harness::new();
    h.script(&[
        "CREATE TABLE enrolments (student INT, course VARCHAR(10), PRIMARY KEY (student, course))",
        "INSERT INTO enrolments VALUES (1, 'math'), (1, 'art'), (2, 'math')",
    ]);
    let err = h
        .try_run("INSERT INTO enrolments VALUES (1, 'MATH')")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    assert_eq!(err.to_string(), "Duplicate entry '1-MATH' for key 'PRIMARY'");
}

#[test]
fn test_decimal_wider_than_28_digits_rejected() {
    let mut h = Harness::new();
    assert_eq!(
        h.try_run("CREATE TABLE d (x DECIMAL(40,30))").unwrap_err().kind(),
        ErrorKind::InvalidSchema
    );
    h.run("CREATE TABLE d (x DECIMAL(28,20))");
    h.run("INSERT INTO d VALUES (1.5)");
    assert_eq!(h.column("SELECT x FROM d"), vec!["1.50000000000000000000"]);
}
