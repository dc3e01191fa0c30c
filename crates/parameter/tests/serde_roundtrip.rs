use cascade_core::ParameterName;
use cascade_parameter::prelude::*;
use cascade_script::{CatalogScript, ScriptRef, ScriptSource};
use pretty_assertions::assert_eq;
use serde_json::json;

fn name(raw: &str) -> ParameterName {
    raw.parse().unwrap()
}

fn inline(primary: &str, fallback: &str) -> ScriptRef {
    ScriptRef::inline(
        ScriptSource::new(primary, false),
        ScriptSource::new(fallback, false),
    )
}

/// The configuration a job with one plain choice and one catalog-backed
/// cascade choice would save.
fn build_collection() -> ParameterCollection {
    let param001 = ChoiceParameter::new(name("param001"), inline("return 1..10", "return []"));
    let param002 = CascadeChoiceParameter::new(
        name("param002"),
        ScriptRef::catalog(
            CatalogScript::new("dummy.groovy")
                .with_parameter("arg1", "bla")
                .must_exist(true),
        ),
        vec![name("param001")],
    );
    ParameterCollection::try_from_defs([
        ParameterDef::Choice(param001),
        ParameterDef::CascadeChoice(param002),
    ])
    .unwrap()
}

fn reload(collection: &ParameterCollection) -> ParameterCollection {
    let json = collection.to_json_pretty().unwrap();
    ParameterCollection::from_json(&json).unwrap()
}

#[test]
fn collection_survives_round_trip() {
    let original = build_collection();
    assert_eq!(reload(&original), original);
}

#[test]
fn inline_script_text_is_preserved() {
    let reloaded = reload(&build_collection());
    let ScriptRef::Inline(script) = reloaded.get_by_name("param001").unwrap().script() else {
        panic!("expected inline script");
    };
    assert_eq!(script.primary().text(), "return 1..10");
    assert_eq!(script.fallback().text(), "return []");
}

#[test]
fn catalog_reference_is_preserved() {
    let reloaded = reload(&build_collection());
    let def = reloaded.get_by_name("param002").unwrap();
    let ScriptRef::Catalog(script) = def.script() else {
        panic!("expected catalog script");
    };
    assert_eq!(script.catalog_id(), "dummy.groovy");
    assert!(script.is_required());
    assert_eq!(script.parameters().len(), 1);
    assert_eq!(script.parameters().get("arg1").map(String::as_str), Some("bla"));
    assert_eq!(def.referenced_parameters(), [name("param001")]);
}

#[test]
fn whitespace_and_unicode_survive_byte_for_byte() {
    let text = "  def x = ['ä', \"b\"]\r\n\treturn x  \n";
    let collection = ParameterCollection::try_from_defs([ParameterDef::Choice(
        ChoiceParameter::new(name("p"), inline(text, "")),
    )])
    .unwrap();

    let reloaded = reload(&collection);
    let ScriptRef::Inline(script) = reloaded.get(0).unwrap().script() else {
        panic!("expected inline script");
    };
    assert_eq!(script.primary().text().as_bytes(), text.as_bytes());
    assert_eq!(script.fallback().text(), "");
}

#[test]
fn random_name_is_stable_across_reloads() {
    let original = build_collection();
    let before = original.get(0).unwrap().metadata().random_name.clone();
    let after = reload(&reload(&original)).get(0).unwrap().metadata().random_name.clone();
    assert_eq!(before, after);
}

#[test]
fn persisted_shape() {
    insta::assert_json_snapshot!(build_collection(), {
        ".parameters[].random_name" => "[random_name]"
    }, @r#"
    {
      "parameters": [
        {
          "kind": "choice",
          "name": "param001",
          "description": "",
          "random_name": "[random_name]",
          "filterable": false,
          "filter_length": 1,
          "script": {
            "type": "inline",
            "primary": {
              "text": "return 1..10",
              "sandboxed": false
            },
            "fallback": {
              "text": "return []",
              "sandboxed": false
            }
          },
          "render_type": "single_select",
          "visible_item_count": 1
        },
        {
          "kind": "cascade_choice",
          "name": "param002",
          "description": "",
          "random_name": "[random_name]",
          "filterable": false,
          "filter_length": 1,
          "script": {
            "type": "catalog",
            "catalog_id": "dummy.groovy",
            "parameters": {
              "arg1": "bla"
            },
            "must_exist": true
          },
          "referenced_parameters": [
            "param001"
          ],
          "render_type": "single_select",
          "visible_item_count": 1
        }
      ]
    }
    "#);
}

#[test]
fn malformed_records_fail_the_load() {
    let cases = [
        // not JSON
        "{",
        // missing script
        r#"{"parameters":[{"kind":"choice","name":"p"}]}"#,
        // blank name
        r#"{"parameters":[{"kind":"choice","name":"  ","script":{"type":"inline","primary":{"text":"[]"},"fallback":{"text":""}}}]}"#,
        // render type from the other family
        r#"{"parameters":[{"kind":"choice","name":"p","render_type":"text_box","script":{"type":"inline","primary":{"text":"[]"},"fallback":{"text":""}}}]}"#,
        // inline script that lost its fallback
        r#"{"parameters":[{"kind":"choice","name":"p","script":{"type":"inline","primary":{"text":"return 1..10"}}}]}"#,
        // unknown kind
        r#"{"parameters":[{"kind":"boolean","name":"p","script":{"type":"inline","primary":{"text":"[]"},"fallback":{"text":""}}}]}"#,
    ];
    for case in cases {
        let err = ParameterCollection::from_json(case).unwrap_err();
        assert!(matches!(err, ParameterError::Load { .. }), "{case}: {err:?}");
    }
}

#[test]
fn legacy_record_loads() {
    let legacy = json!({
        "parameters": [{
            "kind": "dynamic_reference",
            "name": "info",
            "random_name": "choice-parameter-7",
            "script": {
                "type": "inline",
                "primary": {"text": "return ['<b>' + param001 + '</b>']", "sandboxed": true},
                "fallback": {"text": ""}
            },
            "referenced_parameters": "param001,param002",
            "render_type": "ET_FORMATTED_HTML"
        }]
    });
    let collection = ParameterCollection::from_reader(legacy.to_string().as_bytes()).unwrap();
    let def = collection.get(0).unwrap();
    assert_eq!(def.kind(), ParameterKind::DynamicReference);
    assert_eq!(def.render_type(), RenderType::FormattedHtml);
    assert_eq!(def.referenced_parameters(), [name("param001"), name("param002")]);
    let ScriptRef::Inline(script) = def.script() else {
        panic!("expected inline script");
    };
    assert!(script.primary().is_sandboxed());
    assert!(!script.has_fallback());
}
