#![allow(missing_docs)]

use paramql::{
    AttributeDescriptor, Direction, ParseError, QueryParams, QueryParser, SchemaRegistry, ValueType,
};

fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with_attribute("Recurso", AttributeDescriptor::new("id", ValueType::ID))
        .with_attribute("Recurso", AttributeDescriptor::new("nome", ValueType::Text))
        .with_attribute(
            "Recurso",
            AttributeDescriptor::relation("aplicacao", ValueType::ID, "Aplicacao"),
        )
        .with_attribute("Aplicacao", AttributeDescriptor::new("id", ValueType::ID))
        .with_attribute("Aplicacao", AttributeDescriptor::new("nome", ValueType::Text))
}

#[test]
fn directions_wrap_around_repeated_values() {
    let params = QueryParams::new()
        .with_values("direction", ["asc", "desc"])
        .with_values("sort", ["nome", "aplicacao.id", "aplicacao.nome"]);
    let orders = QueryParser::new(registry())
        .orders(&params, "Recurso")
        .expect("orders");
    assert_eq!(orders.len(), 3);
    let directions: Vec<Direction> = orders.iter().map(|o| o.direction()).collect();
    assert_eq!(directions, vec![Direction::Asc, Direction::Desc, Direction::Asc]);
    let lengths: Vec<usize> = orders.iter().map(|o| o.attributes().len()).collect();
    assert_eq!(lengths, vec![1, 2, 2]);
}

#[test]
fn comma_joined_values_behave_like_repeated_ones() {
    let params = QueryParams::new()
        .with("sort", "nome,aplicacao.id,aplicacao.nome")
        .with("direction", "asc,desc");
    let orders = QueryParser::new(registry())
        .orders(&params, "Recurso")
        .expect("orders");
    let rendered: Vec<String> = orders.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec!["nome ASC", "aplicacao.id DESC", "aplicacao.nome ASC"]
    );
}

#[test]
fn missing_sort_yields_no_orders() {
    let params = QueryParams::new().with("direction", "desc");
    let orders = QueryParser::new(registry())
        .orders(&params, "Recurso")
        .expect("orders");
    assert!(orders.is_empty());
}

#[test]
fn sorting_by_identifier_relation_is_allowed() {
    let params = QueryParams::new().with("sort", "aplicacao");
    let orders = QueryParser::new(registry())
        .orders(&params, "Recurso")
        .expect("orders");
    assert_eq!(orders[0].attributes().path(), "aplicacao");
    assert_eq!(orders[0].direction(), Direction::Asc);
}

#[test]
fn invalid_direction_aborts() {
    let params = QueryParams::new()
        .with("sort", "nome")
        .with("direction", "up");
    let err = QueryParser::new(registry())
        .orders(&params, "Recurso")
        .unwrap_err();
    assert_eq!(err, ParseError::InvalidDirection { token: "up".into() });
    assert_eq!(err.code(), "InvalidDirection");
}

#[test]
fn unknown_sort_field_aborts() {
    let params = QueryParams::new().with("sort", "nome,aplicacao.versao");
    let err = QueryParser::new(registry())
        .orders(&params, "Recurso")
        .unwrap_err();
    assert_eq!(err, ParseError::unknown_attribute("versao", "Aplicacao"));
}

#[test]
fn scalar_continuation_is_malformed() {
    let params = QueryParams::new().with("sort", "nome.id");
    let err = QueryParser::new(registry())
        .orders(&params, "Recurso")
        .unwrap_err();
    assert!(matches!(err, ParseError::MalformedPath { ref path, .. } if path == "nome.id"));
}
