/**
 * Precompile tests
 *
 * The module facing entry point: ids, used locals, module names and the
 * serialized block.
 */

#[cfg(test)]
mod tests {
    use glimmer_compiler::precompile::template_id;
    use glimmer_compiler::{precompile, PrecompileOptions, PreprocessOptions};
    use serde_json::json;

    fn options(preprocess: PreprocessOptions) -> PrecompileOptions {
        PrecompileOptions::from(preprocess)
    }

    #[test]
    fn should_serialize_the_block_and_derive_its_id() {
        let template = precompile("<p>{{@x}}</p>", &PrecompileOptions::default()).unwrap();
        assert_eq!(template.block, r#"[[[10,2],[12],[1,[30,1]],[13]],["@x"],false,[]]"#);
        assert_eq!(template.id, template_id(&template.block));
        assert_eq!(template.module_name, "an unknown module");
        assert!(template.scope.is_empty());
        assert!(!template.is_strict_mode);
    }

    #[test]
    fn should_use_a_given_id() {
        let options = PrecompileOptions {
            id: Some("fixed".to_string()),
            ..Default::default()
        };
        assert_eq!(precompile("hi", &options).unwrap().id, "fixed");
    }

    #[test]
    fn should_give_equal_templates_equal_ids() {
        let a = precompile("<div>{{this.a}}</div>", &PrecompileOptions::default()).unwrap();
        let b = precompile("<div>{{this.a}}</div>", &PrecompileOptions::default()).unwrap();
        let c = precompile("<div>{{this.b}}</div>", &PrecompileOptions::default()).unwrap();
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn should_report_used_locals_in_first_use_order() {
        let preprocess = PreprocessOptions::strict()
            .with_locals(["Greeting", "t", "unused"])
            .with_module_name("app/hello.js");
        let template = precompile("{{t}}<Greeting />", &options(preprocess)).unwrap();
        assert_eq!(template.scope, vec!["t".to_string(), "Greeting".to_string()]);
        assert_eq!(template.module_name, "app/hello.js");
        assert!(template.is_strict_mode);
        assert_eq!(
            template.block().map(|block| block.upvars),
            Ok(vec!["t".to_string(), "Greeting".to_string()])
        );
    }

    #[test]
    fn should_render_module_source() {
        let preprocess = PreprocessOptions::strict().with_locals(["t"]);
        let template = PrecompileOptions {
            id: Some("abc".to_string()),
            ..options(preprocess)
        };
        let source = precompile("{{t}}", &template).unwrap().to_module_source();
        assert_eq!(
            source,
            r#"{"id":"abc","block":"[[[1,[32,0]]],[],false,[\"t\"]]","moduleName":"an unknown module","scope":() => [t],"isStrictMode":true}"#
        );
    }

    #[test]
    fn should_surface_syntax_errors() {
        let error = precompile("{{missing}}", &options(PreprocessOptions::strict())).unwrap_err();
        assert_eq!(error.code(), "strict-mode.unresolved-variable");
        assert_eq!(error.payload(), Some(json!("missing")));

        let error = precompile("{{#if a b}}x{{/if}}", &PrecompileOptions::default()).unwrap_err();
        assert_eq!(error.code(), "keywords.invalid-usage");
    }

    #[test]
    fn should_read_options_from_json() {
        let options: PrecompileOptions = serde_json::from_value(json!({
            "strictMode": true,
            "locals": ["x"],
            "meta": { "moduleName": "m.hbs" },
            "id": "from-json"
        }))
        .unwrap();
        let template = precompile("{{x}}", &options).unwrap();
        assert_eq!(template.id, "from-json");
        assert_eq!(template.module_name, "m.hbs");
        assert_eq!(template.scope, vec!["x".to_string()]);
    }

    #[test]
    fn should_serialize_as_camel_case() {
        let template = precompile("hi", &PrecompileOptions::default()).unwrap();
        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["moduleName"], json!("an unknown module"));
        assert_eq!(value["isStrictMode"], json!(false));
        assert_eq!(value["block"], json!(r#"[[[1,"hi"]],[],false,[]]"#));
    }
}
