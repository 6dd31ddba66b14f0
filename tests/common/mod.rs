// Shared harness for the SQL-level integration tests
#![allow(dead_code)]

use primersql::{DatabaseError, Engine, EngineConfig, QueryResult, ResultSet, Session, Value};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Harness {
    pub engine: Engine,
    pub session: Session,
}

impl Harness {
    /// Engine with a `test` database already selected.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        init_logging();
        let engine = Engine::with_config(config.with_default_database("test")).unwrap();
        let session = engine.session();
        Self { engine, session }
    }

    pub fn run(&mut self, sql: &str) -> QueryResult {
        self.engine
            .execute(&mut self.session, sql)
            .unwrap_or_else(|e| panic!("{sql}: {e}"))
    }

    pub fn try_run(&mut self, sql: &str) -> Result<QueryResult, DatabaseError> {
        self.engine.execute(&mut self.session, sql)
    }

    pub fn script(&mut self, sql: &[&str]) {
        for statement in sql {
            self.run(statement);
        }
    }

    pub fn query(&mut self, sql: &str) -> ResultSet {
        match self.run(sql) {
            QueryResult::Rows(set) => set,
            other => panic!("{sql}: expected rows, got {other:?}"),
        }
    }

    /// First column of every row, rendered as text.
    pub fn column(&mut self, sql: &str) -> Vec<String> {
        self.query(sql)
            .rows
            .into_iter()
            .map(|row| row[0].to_string())
            .collect()
    }

    pub fn scalar(&mut self, sql: &str) -> Value {
        let set = self.query(sql);
        assert_eq!(set.rows.len(), 1, "{sql}: expected one row");
        set.rows[0][0].clone()
    }

    /// Load the book catalogue used throughout the query tests.
    pub fn with_books(mut self) -> Self {
        self.script(&[
            "CREATE TABLE books (
                book_id INT NOT NULL AUTO_INCREMENT,
                title VARCHAR(100),
                author_fname VARCHAR(100),
                author_lname VARCHAR(100),
                released_year INT,
                stock_quantity INT,
                pages INT,
                PRIMARY KEY (book_id)
            )",
            "INSERT INTO books (title, author_fname, author_lname, released_year, stock_quantity, pages)
            VALUES
            ('The Namesake', 'Jhumpa', 'Lahiri', 2003, 32, 291),
            ('Norse Mythology', 'Neil', 'Gaiman', 2016, 43, 304),
            ('American Gods', 'Neil', 'Gaiman', 2001, 12, 465),
            ('Interpreter of Maladies', 'Jhumpa', 'Lahiri', 1996, 97, 198),
            ('A Hologram for the King: A Novel', 'Dave', 'Eggers', 2012, 154, 352),
            ('The Circle', 'Dave', 'Eggers', 2013, 26, 504),
            ('The Amazing Adventures of Kavalier & Clay', 'Michael', 'Chabon', 2000, 68, 634),
            ('Just Kids', 'Patti', 'Smith', 2010, 55, 304),
            ('10% Happier', 'Dan', 'Harris', 2014, 29, 256),
            ('fake_book', 'Freida', 'Harris', 2001, 287, 428),
            ('Lincoln In The Bardo', 'George', 'Saunders', 2017, 1000, 367)",
        ]);
        self
    }
}
