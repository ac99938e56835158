#![allow(missing_docs)]

use paramql::query::ValueKind;
use paramql::{
    AttributeDescriptor, Comparator, Operand, ParseError, ParserOptions, QueryParams, QueryParser,
    SchemaRegistry, Value, ValueType,
};
use time::macros::date;

const SCHEMA: &str = r#"
[schemas.Recurso]
id = "identifier"
nome = "text"
aplicacao = { type = "identifier", relation = "Aplicacao" }

[schemas.Aplicacao]
id = "identifier"
nome = "text"
tipo = { type = "enumeration", members = ["A", "B"] }
criadoEm = "date"
preco = "decimal"
ativo = "boolean"
"#;

fn parser() -> QueryParser<SchemaRegistry> {
    QueryParser::new(SchemaRegistry::from_toml_str(SCHEMA).expect("schema"))
}

#[test]
fn bare_literal_is_equality() {
    let params = QueryParams::new().with("nome", "Gol").with("id", "3");
    let predicates = parser().predicates(&params, "Recurso").expect("predicates");
    assert_eq!(predicates.len(), 2);
    assert_eq!(predicates[0].comparator(), Comparator::Equal);
    assert_eq!(predicates[0].value(), &Operand::Single(Value::from("Gol")));
    assert_eq!(predicates[1].comparator(), Comparator::Equal);
    assert_eq!(predicates[1].value(), &Operand::Single(Value::Int(3)));
}

#[test]
fn parse_simple() {
    let params = QueryParams::new().with("nome", "=*Pass").with("id", ">=0");
    let predicates = parser().predicates(&params, "Aplicacao").expect("predicates");
    assert_eq!(predicates.len(), 2);

    let nome = &predicates[0];
    assert_eq!(nome.value().as_single(), Some(&Value::from("Pass")));
    assert_eq!(nome.comparator().to_string(), "=*");
    assert_eq!(nome.attribute().name(), "nome");

    let id = &predicates[1];
    assert_eq!(id.value().as_single(), Some(&Value::Int(0)));
    assert_eq!(id.comparator().to_string(), ">=");
    assert_eq!(id.attribute().name(), "id");
}

#[test]
fn parse_complex_walks_relation() {
    let params = QueryParams::new()
        .with("aplicacao.nome", "=*Pass")
        .with("aplicacao.id", ">=0");
    let predicates = parser().predicates(&params, "Recurso").expect("predicates");
    assert_eq!(predicates.len(), 2);

    let nome = &predicates[0];
    assert_eq!(nome.comparator(), Comparator::EqualIgnoreCase);
    assert_eq!(nome.value().as_single(), Some(&Value::from("Pass")));
    assert_eq!(nome.attributes().len(), 2);
    assert_eq!(nome.attributes().get(0).map(|a| a.name()), Some("aplicacao"));
    assert_eq!(nome.attributes().get(1).map(|a| a.name()), Some("nome"));

    let id = &predicates[1];
    assert_eq!(id.comparator(), Comparator::GreaterThanOrEqual);
    assert_eq!(id.value().as_single(), Some(&Value::Int(0)));
    assert_eq!(id.attributes().path(), "aplicacao.id");
}

#[test]
fn bracket_key_yields_independent_predicates() {
    let params = QueryParams::new()
        .with("id[]", ">=0")
        .with("id[]", "<>100")
        .with("id[]", "<1000");
    let predicates = parser().predicates(&params, "Recurso").expect("predicates");
    assert_eq!(predicates.len(), 3);
    let expected = [
        (Comparator::GreaterThanOrEqual, 0),
        (Comparator::NotEqual, 100),
        (Comparator::LessThan, 1000),
    ];
    for (predicate, (comparator, value)) in predicates.iter().zip(expected) {
        assert_eq!(predicate.comparator(), comparator);
        assert_eq!(predicate.value().as_single(), Some(&Value::Int(value)));
        assert_eq!(predicate.attributes().len(), 1);
        assert_eq!(predicate.attribute().name(), "id");
    }
}

#[test]
fn bracket_text_values_stay_separate() {
    let params = QueryParams::new()
        .with("nome[]", "remove")
        .with("nome[]", "update");
    let predicates = parser().predicates(&params, "Recurso").expect("predicates");
    assert_eq!(predicates.len(), 2);
    assert!(predicates
        .iter()
        .all(|p| p.comparator() == Comparator::Equal));
    assert_eq!(predicates[0].value().as_single(), Some(&Value::from("remove")));
    assert_eq!(predicates[1].value().as_single(), Some(&Value::from("update")));
}

#[test]
fn repeated_key_yields_membership_predicate() {
    let params = QueryParams::new().with_values("nome", ["remove", "update"]);
    let predicates = parser().predicates(&params, "Recurso").expect("predicates");
    assert_eq!(predicates.len(), 1);
    let predicate = &predicates[0];
    assert_eq!(predicate.comparator(), Comparator::ContainsAny);
    assert_eq!(predicate.comparator().to_string(), "*");
    assert_eq!(predicate.attribute().name(), "nome");
    assert_eq!(
        predicate.value(),
        &Operand::Many(vec![Value::from("remove"), Value::from("update")])
    );
}

#[test]
fn repeated_key_members_are_lexed_first() {
    let params = QueryParams::new().with_values("id", ["1", ">=2"]);
    let predicates = parser().predicates(&params, "Recurso").expect("predicates");
    assert_eq!(predicates.len(), 1);
    assert_eq!(predicates[0].comparator(), Comparator::ContainsAny);
    assert_eq!(
        predicates[0].value(),
        &Operand::Many(vec![Value::Int(1), Value::Int(2)])
    );

    let params = QueryParams::new().with_values("id", ["1", "∃"]);
    let err = parser().predicates(&params, "Recurso").unwrap_err();
    assert_eq!(err.code(), "CoercionError");
}

#[test]
fn unknown_first_segment_fails_whole_parse() {
    let params = QueryParams::new()
        .with("nome", "Gol")
        .with("versao", "1")
        .with("id", "2");
    let err = parser().predicates(&params, "Recurso").unwrap_err();
    assert_eq!(err, ParseError::unknown_attribute("versao", "Recurso"));
}

#[test]
fn non_numeric_identifier_is_a_coercion_error() {
    let params = QueryParams::new().with("id", ">=abc");
    let err = parser().predicates(&params, "Recurso").unwrap_err();
    assert_eq!(err, ParseError::coercion("abc", ValueKind::Identifier));
}

#[test]
fn coerces_enumeration_and_date() {
    let parser = parser();
    let tipo = parser.coerce("Aplicacao", "tipo", "A").expect("enum");
    assert_eq!(tipo.value().as_single(), Some(&Value::Enum("A".into())));

    let criado = parser
        .coerce("Aplicacao", "criadoEm", "2016-06-05")
        .expect("date");
    assert_eq!(
        criado.value().as_single(),
        Some(&Value::Date(date!(2016 - 06 - 05)))
    );

    let preco = parser.coerce("Aplicacao", "preco", "<=9.5").expect("decimal");
    assert_eq!(preco.comparator(), Comparator::LessThanOrEqual);
    assert_eq!(preco.value().as_single(), Some(&Value::Float(9.5)));

    let err = parser.coerce("Aplicacao", "ativo", "yes").unwrap_err();
    assert_eq!(err.code(), "CoercionError");
}

#[test]
fn null_markers_carry_no_value() {
    let params = QueryParams::new()
        .with("aplicacao.criadoEm", "∅")
        .with("aplicacao.tipo", "!∅")
        .with("nome", "∃");
    let predicates = parser().predicates(&params, "Recurso").expect("predicates");
    let comparators: Vec<Comparator> = predicates.iter().map(|p| p.comparator()).collect();
    assert_eq!(
        comparators,
        vec![Comparator::Null, Comparator::NotNull, Comparator::Exists]
    );
    assert!(predicates.iter().all(|p| *p.value() == Operand::None));
}

#[test]
fn reserved_and_pagination_keys_are_not_filters() {
    let params = QueryParams::new()
        .with("nome", "Gol")
        .with("id", "3")
        .with("ids[]", "1")
        .with("page", "1")
        .with("per_page", "10")
        .with("sort", "nome")
        .with("direction", "ASC");
    let registry = SchemaRegistry::from_toml_str(SCHEMA)
        .expect("schema")
        .with_attribute("Recurso", AttributeDescriptor::new("ids", ValueType::ID));
    let parsed = QueryParser::new(registry)
        .parse(&params, "Recurso")
        .expect("parsed");
    assert_eq!(parsed.predicates.len(), 3);
    assert_eq!(parsed.orders.len(), 1);
    assert_eq!(parsed.orders[0].to_string(), "nome ASC");
}

#[test]
fn custom_options_rename_reserved_keys() {
    let options = ParserOptions {
        sort_key: "order_by".into(),
        direction_key: "dir".into(),
        ignored_keys: Vec::new(),
        list_separator: None,
    };
    let registry = SchemaRegistry::from_toml_str(SCHEMA).expect("schema");
    let parser = QueryParser::with_options(registry, options);
    let params = QueryParams::new()
        .with("order_by", "nome")
        .with("dir", "desc")
        .with("nome", "Gol");
    let parsed = parser.parse(&params, "Recurso").expect("parsed");
    assert_eq!(parsed.predicates.len(), 1);
    assert_eq!(parsed.orders[0].to_string(), "nome DESC");

    let err = parser
        .parse(&QueryParams::new().with("page", "1"), "Recurso")
        .unwrap_err();
    assert_eq!(err, ParseError::unknown_attribute("page", "Recurso"));
}

#[test]
fn parser_is_shareable_across_threads() {
    let parser = std::sync::Arc::new(parser());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = std::sync::Arc::clone(&parser);
            std::thread::spawn(move || {
                let params = QueryParams::new().with("id", format!("<{i}"));
                parser.predicates(&params, "Recurso").expect("predicates")
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let predicates = handle.join().expect("thread");
        assert_eq!(predicates[0].value().as_single(), Some(&Value::Int(i as i64)));
    }
}
