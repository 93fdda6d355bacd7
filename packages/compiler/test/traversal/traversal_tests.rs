/**
 * Traversal tests
 *
 * Visitor ordering, node removal and replacement, and AST plugins run by
 * `preprocess`.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::utils::{humanize, parse, parse_with};
    use glimmer_compiler::b;
    use glimmer_compiler::traversal::{traverse, AstPlugin, AstPluginEnvironment, NodeVisitor, VisitAction};
    use glimmer_compiler::v1::{
        AttrNode, Block, ElementNode, Expression, HashPair, MustacheCommentStatement, PathExpression, Statement,
        TextNode,
    };
    use glimmer_compiler::PreprocessOptions;

    fn r(kind: &str, detail: &str, depth: usize) -> Vec<String> {
        vec![kind.to_string(), detail.to_string(), depth.to_string()]
    }

    /// Records every hook call as a short event string.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl NodeVisitor for Recorder {
        fn enter_block(&mut self, _: &mut Block) {
            self.events.push("enter block".into());
        }
        fn exit_block(&mut self, _: &mut Block) {
            self.events.push("exit block".into());
        }
        fn element_node(&mut self, node: &mut ElementNode) -> VisitAction<Statement> {
            self.events.push(format!("<{}>", node.tag));
            VisitAction::Keep
        }
        fn exit_element_node(&mut self, node: &mut ElementNode) -> VisitAction<Statement> {
            self.events.push(format!("</{}>", node.tag));
            VisitAction::Keep
        }
        fn attr_node(&mut self, node: &mut AttrNode) -> VisitAction<AttrNode> {
            self.events.push(format!("attr {}", node.name));
            VisitAction::Keep
        }
        fn hash_pair(&mut self, node: &mut HashPair) -> VisitAction<HashPair> {
            self.events.push(format!("pair {}", node.key));
            VisitAction::Keep
        }
        fn path_expression(&mut self, node: &mut PathExpression) -> Option<Expression> {
            self.events.push(format!("path {}", node.original()));
            None
        }
        fn text_node(&mut self, node: &mut TextNode) -> VisitAction<Statement> {
            self.events.push(format!("text {}", node.chars));
            VisitAction::Keep
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn should_visit_in_source_order() {
            let mut template = parse(r#"<div class={{cls}}>{{#if on}}{{fmt v short=s}}{{/if}}!</div>"#);
            let mut recorder = Recorder::default();
            traverse(&mut template, &mut recorder);
            assert_eq!(
                recorder.events,
                vec![
                    "<div>",
                    "attr class",
                    "path cls",
                    "path if",
                    "path on",
                    "enter block",
                    "path fmt",
                    "path v",
                    "pair short",
                    "path s",
                    "exit block",
                    "text !",
                    "</div>",
                ]
            );
        }
    }

    mod mutation {
        use super::*;

        struct DropComments;

        impl NodeVisitor for DropComments {
            fn mustache_comment_statement(&mut self, _: &mut MustacheCommentStatement) -> VisitAction<Statement> {
                VisitAction::Remove
            }
        }

        struct ExpandGreeting;

        impl NodeVisitor for ExpandGreeting {
            fn text_node(&mut self, node: &mut TextNode) -> VisitAction<Statement> {
                if node.chars != "GREETING" {
                    return VisitAction::Keep;
                }
                VisitAction::Replace(vec![
                    Statement::Text(b::text("Hello, ")),
                    Statement::Mustache(b::mustache(b::path("@name"))),
                ])
            }
        }

        struct WrapOnExit {
            exits: usize,
        }

        impl NodeVisitor for WrapOnExit {
            fn exit_element_node(&mut self, node: &mut ElementNode) -> VisitAction<Statement> {
                self.exits += 1;
                if node.tag != "li" {
                    return VisitAction::Keep;
                }
                let wrapper = b::element("span")
                    .children(vec![Statement::Element(node.clone())])
                    .build();
                VisitAction::Replace(vec![Statement::Element(wrapper)])
            }
        }

        struct DropTitles;

        impl NodeVisitor for DropTitles {
            fn attr_node(&mut self, node: &mut AttrNode) -> VisitAction<AttrNode> {
                if node.name == "title" {
                    VisitAction::Remove
                } else {
                    VisitAction::Keep
                }
            }
        }

        #[test]
        fn should_remove_statements() {
            let mut template = parse("a{{! one }}<p>{{! two }}b</p>");
            traverse(&mut template, &mut DropComments);
            assert_eq!(
                humanize(&template),
                vec![r("Text", "a", 0), r("Element", "p", 0), r("Text", "b", 1)]
            );
        }

        #[test]
        fn should_splice_in_replacements_and_visit_them() {
            let mut template = parse("<p>GREETING</p>");
            traverse(&mut template, &mut ExpandGreeting);
            assert_eq!(
                humanize(&template),
                vec![r("Element", "p", 0), r("Text", "Hello, ", 1), r("Mustache", "@name", 1)]
            );
        }

        #[test]
        fn should_not_revisit_exit_replacements() {
            let mut template = parse("<ul><li>x</li><li>y</li></ul>");
            let mut visitor = WrapOnExit { exits: 0 };
            traverse(&mut template, &mut visitor);
            assert_eq!(visitor.exits, 3);
            assert_eq!(
                humanize(&template),
                vec![
                    r("Element", "ul", 0),
                    r("Element", "span", 1),
                    r("Element", "li", 2),
                    r("Text", "x", 3),
                    r("Element", "span", 1),
                    r("Element", "li", 2),
                    r("Text", "y", 3),
                ]
            );
        }

        #[test]
        fn should_remove_attributes() {
            let mut template = parse(r#"<img title="t" alt="a">"#);
            traverse(&mut template, &mut DropTitles);
            assert_eq!(humanize(&template), vec![r("Element", "img", 0), r("Attr", r#"alt="a""#, 1)]);
        }
    }

    mod plugins {
        use super::*;

        struct ThisFallback;

        impl NodeVisitor for ThisFallback {
            fn path_expression(&mut self, node: &mut PathExpression) -> Option<Expression> {
                let name = node.original();
                (name == "legacy").then(|| b::path("this.legacy"))
            }
        }

        #[test]
        fn should_run_plugins_during_preprocess() {
            let options = PreprocessOptions::default()
                .with_plugin(Arc::new(|_: &AstPluginEnvironment| AstPlugin::new("this-fallback", ThisFallback)));
            let template = parse_with("{{legacy}}{{other}}", &options);
            assert_eq!(
                humanize(&template),
                vec![r("Mustache", "this.legacy", 0), r("Mustache", "other", 0)]
            );
        }

        #[test]
        fn should_hand_plugins_the_template_environment() {
            let seen: Arc<Mutex<Vec<AstPluginEnvironment>>> = Arc::default();
            let sink = seen.clone();
            let options = PreprocessOptions::default()
                .with_module_name("app/templates/index.hbs")
                .with_locals(["t"])
                .with_plugin(Arc::new(move |env: &AstPluginEnvironment| {
                    sink.lock().unwrap().push(env.clone());
                    AstPlugin::new("noop", Recorder::default())
                }));
            parse_with("{{t}}", &options);
            let seen = seen.lock().unwrap();
            assert_eq!(
                *seen,
                vec![AstPluginEnvironment {
                    module_name: "app/templates/index.hbs".to_string(),
                    strict_mode: false,
                    locals: vec!["t".to_string()],
                }]
            );
        }

        #[test]
        fn should_apply_plugins_in_order() {
            struct Rename(&'static str, &'static str);

            impl NodeVisitor for Rename {
                fn path_expression(&mut self, node: &mut PathExpression) -> Option<Expression> {
                    (node.original() == self.0).then(|| b::path(self.1))
                }
            }

            let options = PreprocessOptions::default()
                .with_plugin(Arc::new(|_: &AstPluginEnvironment| AstPlugin::new("a", Rename("a", "b"))))
                .with_plugin(Arc::new(|_: &AstPluginEnvironment| AstPlugin::new("b", Rename("b", "c"))));
            let template = parse_with("{{a}}", &options);
            assert_eq!(humanize(&template), vec![r("Mustache", "c", 0)]);
        }
    }
}
