/**
 * Rerender tests
 *
 * Update nodes after the first render: in place writes, no-op polls,
 * rebuilt blocks, modifier lifecycles and how poll results coalesce.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{tracked, Harness};
    use glimmer_runtime::{Capabilities, DomOperations, HelperArgs, Modifier, NodeId, PollResult, Value};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    mod text {
        use super::*;

        #[test]
        fn should_update_text_in_place() {
            let harness = Harness::new();
            let state = tracked(json!({ "foo": "hi" }));
            let mut result = harness.render("<div>{{this.foo}}</div>", state.clone());
            assert_eq!(harness.html(), "<div>hi</div>");

            let div = harness.doc.children(harness.root)[0];
            let text = harness.doc.children(div)[0];
            state.set("foo", "bye");
            assert_eq!(result.rerender(), Ok(PollResult::Invalid));

            assert_eq!(harness.html(), "<div>bye</div>");
            assert_eq!(harness.doc.children(harness.root), vec![div]);
            assert_eq!(harness.doc.children(div), vec![text]);
        }

        #[test]
        fn should_not_touch_the_document_when_nothing_changed() {
            let harness = Harness::new();
            let state = tracked(json!({ "a": 1, "show": true, "items": ["x", "y"] }));
            let mut result = harness.render(
                r#"<p title={{this.a}}>{{this.a}}</p>{{#if this.show}}{{this.a}}{{/if}}{{#each this.items as |item|}}{{item}}{{/each}}"#,
                state,
            );
            let before = (harness.html(), harness.doc.mutations());
            assert_eq!(result.rerender(), Ok(PollResult::Valid));
            assert_eq!(result.rerender(), Ok(PollResult::Valid));
            assert_eq!((harness.html(), harness.doc.mutations()), before);
        }

        #[test]
        fn should_stop_polling_constant_templates() {
            let harness = Harness::new();
            let mut result = harness.render("<p>static {{\"text\"}}</p>", Value::Null);
            let mutations = harness.doc.mutations();
            assert_eq!(result.rerender(), Ok(PollResult::Constant));
            assert_eq!(harness.doc.mutations(), mutations);
        }

        #[test]
        fn should_update_text_inside_an_unchanged_branch() {
            let harness = Harness::new();
            let state = tracked(json!({ "show": true, "name": "Ada" }));
            let mut result = harness.render("{{#if this.show}}<b>{{this.name}}</b>{{/if}}", state.clone());
            let b = harness.doc.children(harness.root)[0];

            state.set("name", "Grace");
            assert_eq!(result.rerender(), Ok(PollResult::Invalid));
            assert_eq!(harness.html(), "<b>Grace</b>");
            assert_eq!(harness.doc.children(harness.root)[0], b);
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn should_update_and_remove_attributes() {
            let harness = Harness::new();
            let state = tracked(json!({ "cls": "a" }));
            let mut result = harness.render("<div class={{this.cls}}></div>", state.clone());
            assert_eq!(harness.html(), r#"<div class="a"></div>"#);

            state.set("cls", "b");
            result.rerender().unwrap();
            assert_eq!(harness.html(), r#"<div class="b"></div>"#);

            state.set("cls", Value::Null);
            result.rerender().unwrap();
            assert_eq!(harness.html(), "<div></div>");
        }

        #[test]
        fn should_write_input_values_as_properties() {
            let harness = Harness::new();
            let state = tracked(json!({ "text": "one" }));
            let mut result = harness.render("<input value={{this.text}}>", state.clone());
            let input = harness.doc.children(harness.root)[0];
            assert_eq!(harness.doc.property(input, "value"), Some(Value::from("one")));

            state.set("text", "two");
            result.rerender().unwrap();
            assert_eq!(harness.doc.property(input, "value"), Some(Value::from("two")));
            assert_eq!(harness.doc.attribute(input, "value"), None);
        }
    }

    mod blocks {
        use super::*;

        #[test]
        fn should_swap_branches_when_the_condition_changes() {
            let harness = Harness::new();
            let state = tracked(json!({ "show": true }));
            let mut result = harness.render("{{#if this.show}}<b>yes</b>{{else}}<i>no</i>{{/if}}!", state.clone());
            assert_eq!(harness.html(), "<b>yes</b>!");

            state.set("show", false);
            assert_eq!(result.rerender(), Ok(PollResult::Invalid));
            assert_eq!(harness.html(), "<i>no</i>!");

            state.set("show", true);
            result.rerender().unwrap();
            assert_eq!(harness.html(), "<b>yes</b>!");
        }

        #[test]
        fn should_keep_the_branch_when_the_condition_stays_truthy() {
            let harness = Harness::new();
            let state = tracked(json!({ "count": 1 }));
            let mut result = harness.render("{{#if this.count}}<b>yes</b>{{/if}}", state.clone());
            let b = harness.doc.children(harness.root)[0];
            let mutations = harness.doc.mutations();

            state.set("count", 2);
            assert_eq!(result.rerender(), Ok(PollResult::Valid));
            assert_eq!(harness.doc.mutations(), mutations);
            assert_eq!(harness.doc.children(harness.root), vec![b]);

            state.set("count", 0);
            assert_eq!(result.rerender(), Ok(PollResult::Invalid));
            assert_eq!(harness.html(), "<!---->");
        }

        #[test]
        fn should_keep_the_branch_of_unless_when_the_condition_stays_falsy() {
            let harness = Harness::new();
            let state = tracked(json!({ "name": "" }));
            let mut result = harness.render("{{#unless this.name}}<i>anonymous</i>{{/unless}}", state.clone());
            let i = harness.doc.children(harness.root)[0];

            state.set("name", Value::Null);
            assert_eq!(result.rerender(), Ok(PollResult::Valid));
            assert_eq!(harness.doc.children(harness.root), vec![i]);
        }

        #[test]
        fn should_keep_watching_the_condition_after_the_content_settles() {
            let source = tracked(json!({ "v": "a" }));
            let calls = Rc::new(RefCell::new(0));
            let capabilities = {
                let source = source.clone();
                let calls = calls.clone();
                Capabilities::new().with_helper("once", move |_: &HelperArgs| {
                    *calls.borrow_mut() += 1;
                    if *calls.borrow() == 1 {
                        source.get("v")
                    } else {
                        Value::from("b")
                    }
                })
            };
            let harness = Harness::with(capabilities);
            let state = tracked(json!({ "show": true }));
            let mut result = harness.render("{{#if this.show}}{{once}}{{/if}}", state.clone());
            assert_eq!(harness.html(), "a");

            source.set("v", "x");
            assert_eq!(result.rerender(), Ok(PollResult::Invalid));
            assert_eq!(harness.html(), "b");
            assert_eq!(result.rerender(), Ok(PollResult::Valid));

            state.set("show", false);
            assert_eq!(result.rerender(), Ok(PollResult::Invalid));
            assert_eq!(harness.html(), "<!---->");
        }

        #[test]
        fn should_keep_an_empty_branch_in_place() {
            let harness = Harness::new();
            let state = tracked(json!({ "show": false }));
            let mut result = harness.render("a{{#if this.show}}x{{/if}}b", state.clone());
            assert_eq!(harness.html(), "a<!---->b");

            state.set("show", true);
            result.rerender().unwrap();
            assert_eq!(harness.html(), "axb");
        }

        #[test]
        fn should_rebuild_each_when_the_list_changes() {
            let harness = Harness::new();
            let state = tracked(json!({ "items": ["a", "b"] }));
            let mut result = harness.render(
                "<ul>{{#each this.items as |item i|}}<li>{{i}}:{{item}}</li>{{else}}<li>none</li>{{/each}}</ul>",
                state.clone(),
            );
            assert_eq!(harness.html(), "<ul><li>0:a</li><li>1:b</li></ul>");

            state.set("items", Value::array([Value::from("c")]));
            assert_eq!(result.rerender(), Ok(PollResult::Invalid));
            assert_eq!(harness.html(), "<ul><li>0:c</li></ul>");

            state.set("items", Value::array([]));
            result.rerender().unwrap();
            assert_eq!(harness.html(), "<ul><li>none</li></ul>");
        }

        #[test]
        fn should_replace_trusted_html() {
            let harness = Harness::new();
            let state = tracked(json!({ "html": "<b>1</b>" }));
            let mut result = harness.render("<p>{{{this.html}}}</p>", state.clone());
            state.set("html", "<i>2</i>");
            result.rerender().unwrap();
            assert_eq!(harness.html(), "<p><i>2</i></p>");
        }
    }

    mod modifiers {
        use super::*;

        struct Recorder {
            events: Rc<RefCell<Vec<String>>>,
        }

        impl Modifier for Recorder {
            fn install(&mut self, dom: &dyn DomOperations, element: NodeId, args: &HelperArgs) {
                let tag = dom.tag_name(element).unwrap_or_default();
                self.events
                    .borrow_mut()
                    .push(format!("install {tag} {}", args.positional(0).to_display_string()));
            }

            fn update(&mut self, _dom: &dyn DomOperations, _element: NodeId, args: &HelperArgs) {
                self.events
                    .borrow_mut()
                    .push(format!("update {}", args.positional(0).to_display_string()));
            }

            fn destroy(&mut self, _element: NodeId) {
                self.events.borrow_mut().push("destroy".to_string());
            }
        }

        #[test]
        fn should_install_update_and_destroy() {
            let events = Rc::new(RefCell::new(Vec::new()));
            let capabilities = {
                let events = events.clone();
                Capabilities::new().with_modifier("track", move || Recorder { events: events.clone() })
            };
            let harness = Harness::with(capabilities);
            let state = tracked(json!({ "show": true, "label": "a" }));
            let mut result = harness.render(
                "{{#if this.show}}<div {{track this.label}}></div>{{/if}}",
                state.clone(),
            );
            assert_eq!(*events.borrow(), ["install div a"]);

            state.set("label", "b");
            result.rerender().unwrap();
            assert_eq!(*events.borrow(), ["install div a", "update b"]);

            state.set("show", false);
            result.rerender().unwrap();
            assert_eq!(*events.borrow(), ["install div a", "update b", "destroy"]);
            assert_eq!(harness.html(), "<!---->");
        }

        #[test]
        fn should_destroy_when_the_result_is_destroyed() {
            let events = Rc::new(RefCell::new(Vec::new()));
            let capabilities = {
                let events = events.clone();
                Capabilities::new().with_modifier("track", move || Recorder { events: events.clone() })
            };
            let harness = Harness::with(capabilities);
            let result = harness.render(r#"<p {{track "x"}}></p>"#, Value::Null);

            harness.env.transaction(|tx| {
                result.destroy(tx);
                assert_eq!(tx.pending(), 1);
                assert_eq!(events.borrow().len(), 1);
            });
            assert_eq!(*events.borrow(), ["install p x", "destroy"]);
            assert_eq!(harness.html(), "");
        }
    }

    mod poll_results {
        use super::*;
        use glimmer_runtime::PollResult::{Constant, Invalid, Valid};

        #[test]
        fn should_coalesce_every_pair() {
            let table = [
                ((Valid, Valid), Valid),
                ((Valid, Invalid), Invalid),
                ((Valid, Constant), Invalid),
                ((Invalid, Valid), Invalid),
                ((Invalid, Invalid), Invalid),
                ((Invalid, Constant), Invalid),
                ((Constant, Valid), Invalid),
                ((Constant, Invalid), Invalid),
                ((Constant, Constant), Constant),
            ];
            for ((a, b), expected) in table {
                assert_eq!(PollResult::combine([a, b]), expected, "{a:?} + {b:?}");
            }
        }

        #[test]
        fn should_treat_no_results_as_constant() {
            assert_eq!(PollResult::combine([]), Constant);
        }
    }
}
