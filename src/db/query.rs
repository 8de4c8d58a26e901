use chrono::NaiveDate;

/// A positional statement parameter, bound as `$n` in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    Text(String),
    NullableText(Option<String>),
    Date(NaiveDate),
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<Option<String>> for SqlParam {
    fn from(value: Option<String>) -> Self {
        SqlParam::NullableText(value)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(value: NaiveDate) -> Self {
        SqlParam::Date(value)
    }
}

/// Statement text plus its positional parameters.
///
/// The statement is `&'static str`, so values can only travel through
/// [`SqlParam`]s and never end up spliced into the SQL itself.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    pub statement: &'static str,
    pub params: Vec<SqlParam>,
}

impl QueryDescriptor {
    pub fn new(statement: &'static str) -> Self {
        Self {
            statement,
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, param: impl Into<SqlParam>) -> Self {
        self.params.push(param.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_keep_declaration_order() {
        let dob = NaiveDate::from_ymd_opt(1950, 1, 1).unwrap();
        let query = QueryDescriptor::new("UPDATE senior SET firstname = $1, middlename = $2, dateofbirth = $3 WHERE id = $4")
            .bind("Ana")
            .bind(None::<String>)
            .bind(dob)
            .bind(7);

        assert_eq!(
            query.params,
            vec![
                SqlParam::Text("Ana".into()),
                SqlParam::NullableText(None),
                SqlParam::Date(dob),
                SqlParam::Int(7),
            ]
        );
    }

    #[test]
    fn test_values_stay_out_of_statement_text() {
        let hostile = "x'; DROP TABLE senior; --";
        let query = QueryDescriptor::new("SELECT id FROM auth WHERE username = $1").bind(hostile);
        assert!(!query.statement.contains(hostile));
        assert_eq!(query.params, vec![SqlParam::Text(hostile.into())]);
    }
}
