use crate::types::{DataType, DefaultValue, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateDatabase {
        name: String,
        if_not_exists: bool,
    },
    DropDatabase {
        name: String,
        if_exists: bool,
    },
    UseDatabase {
        name: String,
    },
    ShowDatabases,
    ShowTables,
    /// `DESCRIBE t`, `DESC t`, `SHOW COLUMNS FROM t`
    Describe {
        table: String,
    },
    CreateTable {
        name: String,
        if_not_exists: bool,
        columns: Vec<ColumnDef>,
        /// Table-level `PRIMARY KEY (a, b)` clauses, in order of appearance
        primary_keys: Vec<Vec<String>>,
        /// `AUTO_INCREMENT = n` table option
        auto_increment_start: Option<i64>,
    },
    DropTable {
        name: String,
        if_exists: bool,
    },
    Insert {
        table: String,
        columns: Option<Vec<String>>,
        rows: Vec<Vec<Expression>>,
    },
    Select {
        distinct: bool,
        items: Vec<SelectItem>,
        from: Option<String>,
        filter: Option<Condition>,
        order_by: Vec<OrderByItem>,
        limit: Option<usize>,
        offset: Option<usize>,
    },
    Update {
        table: String,
        assignments: Vec<(String, Expression)>,
        filter: Option<Condition>,
    },
    Delete {
        table: String,
        filter: Option<Condition>,
    },
}

impl Statement {
    /// True for statements that never change engine state.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::Select { .. }
                | Self::ShowDatabases
                | Self::ShowTables
                | Self::Describe { .. }
                | Self::UseDatabase { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub not_null: bool,
    pub default: Option<DefaultValue>,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub on_update_now: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimSide {
    Both,
    Leading,
    Trailing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Value),
    Column(String),
    Function {
        name: String,
        args: Vec<Expression>,
    },
    /// `TRIM([BOTH|LEADING|TRAILING] [remove] FROM source)`
    Trim {
        side: TrimSide,
        remove: Option<Box<Expression>>,
        source: Box<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Comparison {
        left: Expression,
        op: CompareOp,
        right: Expression,
    },
    Like {
        expr: Expression,
        pattern: Expression,
        negated: bool,
    },
    Between {
        expr: Expression,
        low: Expression,
        high: Expression,
        negated: bool,
    },
    In {
        expr: Expression,
        list: Vec<Expression>,
        negated: bool,
    },
    IsNull {
        expr: Expression,
        negated: bool,
    },
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    Wildcard,
    Expr {
        expr: Expression,
        /// Expression text as written, used as the output label
        label: String,
        alias: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Expr(Expression),
    /// 1-based output column position
    Position(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub key: SortKey,
    pub order: SortOrder,
}
