//! End-to-end form rendering against an in-memory graph and transport.

use std::rc::Rc;

use futures::executor::LocalPool;
use oxigraph::model::vocab::rdf;
use oxigraph::model::{Literal, NamedNode, Term};

use rdf_forms::config::FormsConfig;
use rdf_forms::forms::{FormContext, RecursionGuard, append_form, ignore};
use rdf_forms::graph::{GraphAccessor, MemoryGraph, boolean_term, statement};
use rdf_forms::mint::Minter;
use rdf_forms::update::MemoryTransport;
use rdf_forms::widget::{ElementKind, Widget};

const DOC: &str = "http://ex.org/d";

struct Fixture {
    pool: LocalPool,
    ctx: FormContext,
    graph: Rc<MemoryGraph>,
    transport: Rc<MemoryTransport>,
    doc: NamedNode,
}

impl Fixture {
    fn new(ttl: &str) -> Self {
        let doc = NamedNode::new_unchecked(DOC);
        let graph = Rc::new(MemoryGraph::new());
        graph.load_turtle(ttl.as_bytes(), &doc).unwrap();
        let pool = LocalPool::new();
        let (ctx, transport) = FormContext::in_memory(graph.clone(), Rc::new(pool.spawner()));
        Self {
            pool,
            ctx,
            graph,
            transport,
            doc,
        }
    }

    fn render(&mut self, subject: &str, form: &str) -> Widget {
        let widget = append_form(
            &self.ctx,
            None,
            &RecursionGuard::new(),
            &t(subject),
            &t(form),
            &self.doc,
            ignore(),
        );
        self.pool.run_until_stalled();
        widget
    }

    fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Pin minted identifiers to `<doc>#id<millis>`, counting up.
    fn with_clock(mut self, millis: u128) -> Self {
        self.ctx = self.ctx.clone().with_minter(Minter::with_clock(move || millis));
        self
    }

    /// Load extra statements into another document.
    fn load_into(&self, ttl: &str, doc: &str) -> NamedNode {
        let doc = NamedNode::new_unchecked(doc);
        self.graph.load_turtle(ttl.as_bytes(), &doc).unwrap();
        doc
    }

    fn list(&self, subject: &str, property: &str) -> Vec<Term> {
        let head = self.graph.value(&t(subject), n(property).as_ref()).unwrap();
        self.graph.collection_elements(&head, None).unwrap()
    }
}

fn n(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("{DOC}#{local}"))
}

fn t(local: &str) -> Term {
    Term::NamedNode(n(local))
}

fn items(widget: &Widget) -> Vec<Widget> {
    widget
        .descendants()
        .into_iter()
        .filter(|w| w.subject().is_some())
        .collect()
}

fn text(value: &str) -> Term {
    Term::Literal(Literal::new_simple_literal(value))
}

fn button(item: &Widget, text: &str) -> Widget {
    item.children()
        .into_iter()
        .find(|c| c.kind() == ElementKind::Button && c.text() == text)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Group, Boolean and text fields
// ---------------------------------------------------------------------------

const TODO_FORM: &str = r#"
    @prefix ui: <http://www.w3.org/ns/ui#> .
    <#form> a ui:Group ; ui:part <#doneField>, <#titleField> .
    <#doneField> a ui:BooleanField ; ui:property <#done> ; ui:sequence 1 .
    <#titleField> a ui:TextField ; ui:property <#title> ; ui:sequence 2 .
"#;

#[test]
fn new_task_checkbox_and_title() {
    let mut fx = Fixture::new(TODO_FORM);
    let form = fx.render("task", "form");

    let toggle = form.find_all(ElementKind::Checkbox).remove(0);
    let title = form.find_all(ElementKind::TextInput).remove(0);
    assert_eq!(toggle.toggle(), Some(false));
    assert_eq!(title.text(), "");

    assert!(toggle.click());
    fx.run();
    let request = fx.transport.last_request().unwrap();
    assert!(request.deletions.is_empty());
    assert_eq!(
        request.insertions,
        vec![
            statement(&t("task"), n("done").as_ref(), boolean_term(true), fx.doc.as_ref())
                .unwrap()
        ]
    );
    assert_eq!(toggle.toggle(), Some(true));

    title.type_text("Buy milk");
    assert!(title.is_dirty());
    title.commit();
    fx.run();
    let request = fx.transport.last_request().unwrap();
    assert!(request.deletions.is_empty());
    assert_eq!(
        request.insertions,
        vec![
            statement(
                &t("task"),
                n("title").as_ref(),
                Literal::new_simple_literal("Buy milk"),
                fx.doc.as_ref()
            )
            .unwrap()
        ]
    );
    assert!(!title.is_dirty());
}

#[test]
fn self_referencing_group_renders_a_stub() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        <#form> a ui:Group ; ui:part <#note>, <#form> .
        <#note> a ui:Comment ; ui:contents "About this task" ; ui:sequence 1 .
        "#,
    );
    let form = fx.render("task", "form");
    assert_eq!(form.find_all(ElementKind::LoopStub).len(), 1);
    assert_eq!(form.find_all(ElementKind::Text).len(), 1);
    assert!(form.error_messages().is_empty());
}

#[test]
fn bad_field_does_not_stop_its_siblings() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        <#form> a ui:Group ; ui:part <#broken>, <#odd>, <#ok> .
        <#broken> a ui:BooleanField ; ui:sequence 1 .
        <#odd> a <#Gadget> ; ui:sequence 2 .
        <#ok> a ui:TextField ; ui:property <#title> ; ui:sequence 3 .
        "#,
    );
    let form = fx.render("task", "form");
    assert_eq!(form.error_messages().len(), 2);
    assert_eq!(form.find_all(ElementKind::TextInput).len(), 1);
}

#[test]
fn failed_write_is_shown_and_control_unlocked() {
    let mut fx = Fixture::new(TODO_FORM);
    let form = fx.render("task", "form");
    let toggle = form.find_all(ElementKind::Checkbox).remove(0);

    fx.transport.fail_next("disk full");
    toggle.click();
    fx.run();
    assert!(!toggle.is_disabled());
    assert_eq!(toggle.toggle(), Some(false));
    let errors = form.error_messages();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("disk full"));
}

#[test]
fn control_is_locked_while_write_is_pending() {
    let mut fx = Fixture::new(TODO_FORM);
    let form = fx.render("task", "form");
    let toggle = form.find_all(ElementKind::Checkbox).remove(0);

    fx.transport.hold();
    toggle.click();
    fx.run();
    assert!(toggle.is_disabled());
    assert!(!toggle.click());
    assert_eq!(fx.transport.release(), 1);
    fx.run();
    assert!(!toggle.is_disabled());
    assert_eq!(fx.transport.requests().len(), 1);
}

#[test]
fn read_only_document_disables_inputs() {
    let mut fx = Fixture::new(TODO_FORM);
    fx.transport.set_read_only(&fx.doc);
    let form = fx.render("task", "form");
    assert!(form.find_all(ElementKind::Checkbox)[0].is_disabled());
    assert!(form.find_all(ElementKind::TextInput)[0].is_disabled());
}

#[test]
fn value_in_read_only_document_is_kept_and_edits_go_to_data_document() {
    let mut fx = Fixture::new(TODO_FORM);
    let archive = fx.load_into(
        r#"<http://ex.org/d#task> <http://ex.org/d#title> "Old title" ."#,
        "http://ex.org/archive",
    );
    fx.transport.set_read_only(&archive);
    let form = fx.render("task", "form");
    let title = form.find_all(ElementKind::TextInput).remove(0);
    assert!(!title.is_disabled());
    assert_eq!(title.text(), "Old title");

    title.type_text("New title");
    title.commit();
    fx.run();
    assert!(form.error_messages().is_empty());
    let request = fx.transport.last_request().unwrap();
    assert!(request.deletions.is_empty());
    let saved =
        statement(&t("task"), n("title").as_ref(), text("New title"), fx.doc.as_ref());
    assert_eq!(request.insertions, vec![saved.clone().unwrap()]);
    let archived = fx.graph.holds(
        &t("task"),
        n("title").as_ref(),
        &text("Old title"),
        Some(archive.as_ref()),
    );
    assert!(archived);

    title.type_text("Newer title");
    title.commit();
    fx.run();
    assert!(form.error_messages().is_empty());
    let request = fx.transport.last_request().unwrap();
    assert_eq!(request.deletions, vec![saved.unwrap()]);
    assert_eq!(request.insertions.len(), 1);
    assert_eq!(request.insertions[0].graph_name.to_string(), fx.doc.to_string());
}

#[test]
fn unchanged_text_is_not_written() {
    let mut fx = Fixture::new(&format!("{TODO_FORM}\n<#task> <#title> \"Same\" ."));
    let form = fx.render("task", "form");
    let title = form.find_all(ElementKind::TextInput).remove(0);
    title.type_text("Same");
    title.commit();
    fx.run();
    assert!(fx.transport.requests().is_empty());
    assert!(!title.is_dirty());
}

#[test]
fn empty_field_is_hidden_in_read_only_document() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        <#form> a ui:Group ; ui:part <#nickField>, <#bioField>, <#hint>, <#note> .
        <#nickField> a ui:SingleLineTextField ; ui:property <#nick> ;
            ui:suppressEmptyUneditable true ; ui:sequence 1 .
        <#bioField> a ui:SingleLineTextField ; ui:property <#bio> ; ui:sequence 2 .
        <#hint> a ui:Comment ; ui:contents "Click to edit" ;
            ui:suppressIfUneditable true ; ui:sequence 3 .
        <#note> a ui:Comment ; ui:contents "Public profile" ; ui:sequence 4 .
        "#,
    );
    fx.transport.set_read_only(&fx.doc);
    let form = fx.render("me", "form");
    let rows: Vec<bool> = form
        .find_all(ElementKind::TextInput)
        .iter()
        .map(|input| input.parent().unwrap().is_hidden())
        .collect();
    assert_eq!(rows, vec![true, false]);
    let hint = form.find_text(ElementKind::Text, "Click to edit").unwrap();
    assert!(hint.parent().unwrap().is_hidden());
    let note = form.find_text(ElementKind::Text, "Public profile").unwrap();
    assert!(!note.parent().unwrap().is_hidden());
}

#[test]
fn suppression_does_not_apply_when_editable() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        <#form> a ui:Group ; ui:part <#nickField>, <#hint> .
        <#nickField> a ui:SingleLineTextField ; ui:property <#nick> ;
            ui:suppressEmptyUneditable true ; ui:sequence 1 .
        <#hint> a ui:Comment ; ui:contents "Click to edit" ;
            ui:suppressIfUneditable true ; ui:sequence 2 .
        "#,
    );
    let form = fx.render("me", "form");
    let nick = form.find_all(ElementKind::TextInput).remove(0);
    assert!(!nick.parent().unwrap().is_hidden());
    let hint = form.find_text(ElementKind::Text, "Click to edit").unwrap();
    assert!(!hint.parent().unwrap().is_hidden());
}

#[test]
fn explicit_parts_list_sets_the_order() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        <#form> a ui:Group ; ui:parts ( <#second> <#first> ) .
        <#first> a ui:Comment ; ui:contents "first by sequence" ; ui:sequence 1 .
        <#second> a ui:Comment ; ui:contents "first by list" ; ui:sequence 2 .
        "#,
    );
    let form = fx.render("me", "form");
    let shown: Vec<String> = form
        .find_all(ElementKind::Text)
        .iter()
        .map(|t| t.text())
        .collect();
    assert_eq!(shown, vec!["first by list", "first by sequence"]);
}

// ---------------------------------------------------------------------------
// Tri-state
// ---------------------------------------------------------------------------

#[test]
fn default_is_shown_but_not_stored() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        <#field> a ui:TristateField ; ui:property <#urgent> ; ui:default true .
        "#,
    );
    let widget = fx.render("task", "field");
    let toggle = widget.find_all(ElementKind::Checkbox).remove(0);
    assert_eq!(toggle.toggle(), Some(true));
    assert!(fx.graph.values(&t("task"), n("urgent").as_ref()).is_empty());

    toggle.click();
    fx.run();
    let request = fx.transport.last_request().unwrap();
    assert!(request.deletions.is_empty());
    assert_eq!(
        request.insertions,
        vec![
            statement(&t("task"), n("urgent").as_ref(), boolean_term(false), fx.doc.as_ref())
                .unwrap()
        ]
    );
    assert_eq!(toggle.toggle(), Some(false));
}

#[test]
fn tristate_cycles_through_unset() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        <#field> a ui:TristateField ; ui:property <#urgent> .
        <#task> <#urgent> false .
        "#,
    );
    let widget = fx.render("task", "field");
    let toggle = widget.find_all(ElementKind::Checkbox).remove(0);
    let holds = |fx: &Fixture, v: bool| {
        fx.graph
            .holds(&t("task"), n("urgent").as_ref(), &boolean_term(v), None)
    };
    assert_eq!(toggle.toggle(), Some(false));

    toggle.click();
    fx.run();
    assert!(holds(&fx, true) && !holds(&fx, false));
    assert_eq!(toggle.toggle(), Some(true));

    toggle.click();
    fx.run();
    assert!(!holds(&fx, true) && !holds(&fx, false));
    assert_eq!(toggle.toggle(), None);

    toggle.click();
    fx.run();
    assert!(!holds(&fx, true) && holds(&fx, false));
    assert_eq!(toggle.toggle(), Some(false));
}

#[test]
fn both_states_asserted_is_inconsistent() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        <#field> a ui:BooleanField ; ui:property <#urgent> .
        <#task> <#urgent> true, false .
        "#,
    );
    let widget = fx.render("task", "field");
    assert!(widget.find_all(ElementKind::Checkbox)[0].is_hidden());
    assert!(widget.error_messages()[0].contains("inconsistent"));
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

const PET_FORM: &str = r#"
    @prefix ui: <http://www.w3.org/ns/ui#> .
    <#form> a ui:Group ; ui:part <#kindField>, <#branch> .
    <#kindField> a ui:Choice ; ui:property <#kind> ; ui:from <#Kind> ; ui:sequence 1 .
    <#branch> a ui:Options ; ui:dependingOn <#kind> ; ui:case <#catCase>, <#dogCase> ; ui:sequence 2 .
    <#catCase> ui:for <#feline> ; ui:use <#catNote> .
    <#dogCase> ui:for <#canine>, <#wolfish> ; ui:use <#dogNote> .
    <#catNote> a ui:Comment ; ui:contents "Cats need a scratching post" .
    <#dogNote> a ui:Comment ; ui:contents "Dogs need walks" .
    <#feline> a <#Kind> .
    <#canine> a <#Kind> .
    <#tom> <#kind> <#feline> .
"#;

#[test]
fn options_follow_the_dependency_value() {
    let mut fx = Fixture::new(PET_FORM);
    let form = fx.render("tom", "form");
    assert!(form.find_text(ElementKind::Text, "Cats need a scratching post").is_some());
    assert!(form.find_text(ElementKind::Text, "Dogs need walks").is_none());

    let select = form.find_all(ElementKind::Select).remove(0);
    select.choose(&[t("canine")]);
    fx.run();
    assert!(form.find_text(ElementKind::Text, "Cats need a scratching post").is_none());
    assert!(form.find_text(ElementKind::Text, "Dogs need walks").is_some());
}

#[test]
fn choice_leaves_values_in_read_only_documents_alone() {
    let mut fx = Fixture::new(PET_FORM);
    let archive = fx.load_into(
        "<http://ex.org/d#rex> <http://ex.org/d#kind> <http://ex.org/d#feline> .",
        "http://ex.org/archive",
    );
    fx.transport.set_read_only(&archive);
    let widget = fx.render("rex", "kindField");
    let select = widget.find_all(ElementKind::Select).remove(0);
    assert!(select.selected_terms().is_empty());

    select.choose(&[t("canine")]);
    fx.run();
    assert!(widget.error_messages().is_empty());
    let request = fx.transport.last_request().unwrap();
    assert!(request.deletions.is_empty());
    assert_eq!(
        request.insertions,
        vec![statement(&t("rex"), n("kind").as_ref(), t("canine"), fx.doc.as_ref()).unwrap()]
    );
    let archived =
        fx.graph.holds(&t("rex"), n("kind").as_ref(), &t("feline"), Some(archive.as_ref()));
    assert!(archived);
}

#[test]
fn options_follow_a_class_set_by_a_classifier() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        <#Animal> owl:disjointUnionOf ( <#Cat> <#Dog> ) .
        <#form> a ui:Group ; ui:part <#kindField>, <#branch> .
        <#kindField> a ui:Classifier ; ui:category <#Animal> ; ui:sequence 1 .
        <#branch> a ui:Options ; ui:case <#catCase>, <#dogCase> ; ui:sequence 2 .
        <#catCase> ui:for <#Cat> ; ui:use <#catNote> .
        <#dogCase> ui:for <#Dog> ; ui:use <#dogNote> .
        <#catNote> a ui:Comment ; ui:contents "Cats purr" .
        <#dogNote> a ui:Comment ; ui:contents "Dogs bark" .
        <#tom> a <#Cat> .
        "#,
    );
    let form = fx.render("tom", "form");
    assert!(form.find_text(ElementKind::Text, "Cats purr").is_some());

    form.find_all(ElementKind::Select).remove(0).choose(&[t("Dog")]);
    fx.run();
    assert!(fx.graph.holds(&t("tom"), rdf::TYPE, &t("Dog"), None));
    assert!(!fx.graph.holds(&t("tom"), rdf::TYPE, &t("Cat"), None));
    assert!(form.find_text(ElementKind::Text, "Cats purr").is_none());
    assert!(form.find_text(ElementKind::Text, "Dogs bark").is_some());
}

#[test]
fn options_without_a_match_render_nothing() {
    let mut fx = Fixture::new(PET_FORM);
    let widget = fx.render("rex", "branch");
    assert!(widget.children().is_empty());
    assert!(widget.error_messages().is_empty());
}

// ---------------------------------------------------------------------------
// Choice
// ---------------------------------------------------------------------------

const ORG_CHOICE: &str = r#"
    @prefix ui: <http://www.w3.org/ns/ui#> .
    <#acme> a <#Org> .
    <#orgForm> a ui:SingleLineTextField ; ui:property <#motto> .
"#;

#[test]
fn minting_from_a_choice_opens_its_sub_form() {
    let mut fx = Fixture::new(&format!(
        "{ORG_CHOICE}
        <#field> a ui:Choice ; ui:property <#employer> ; ui:from <#Org> ;
            ui:canMintNew true ; ui:use <#orgForm> ."
    ))
    .with_clock(42);
    let widget = fx.render("me", "field");
    let select = widget.find_all(ElementKind::Select).remove(0);
    assert!(select.options().iter().any(|o| o.label == "* New *"));
    assert!(widget.find_all(ElementKind::TextInput).is_empty());

    assert!(select.choose_mint());
    fx.run();
    let linked =
        fx.graph.holds(&t("me"), n("employer").as_ref(), &t("id42"), Some(fx.doc.as_ref()));
    assert!(linked);
    let motto = widget.find_all(ElementKind::TextInput).remove(0);
    motto.type_text("Anvils");
    motto.commit();
    fx.run();
    assert!(fx.graph.holds(&t("id42"), n("motto").as_ref(), &text("Anvils"), None));
}

#[test]
fn minting_without_a_sub_form_uses_the_creation_form() {
    let mut fx = Fixture::new(&format!(
        "{ORG_CHOICE}
        <#Org> ui:creationForm <#verifyForm> .
        <#verifyForm> a ui:BooleanField ; ui:property <#verified> .
        <#field> a ui:Choice ; ui:property <#employer> ; ui:from <#Org> ; ui:canMintNew true ."
    ))
    .with_clock(42);
    let widget = fx.render("me", "field");
    let select = widget.find_all(ElementKind::Select).remove(0);
    assert!(select.choose_mint());
    fx.run();
    assert!(widget.find_text(ElementKind::Text, "New org").is_some());
    assert!(fx.transport.requests().is_empty());

    widget.find_all(ElementKind::Checkbox).remove(0).click();
    fx.run();
    assert!(fx.graph.holds(&t("id42"), n("verified").as_ref(), &boolean_term(true), None));
    assert!(fx.graph.holds(&t("me"), n("employer").as_ref(), &t("id42"), None));
    assert!(fx.graph.holds(&t("id42"), rdf::TYPE, &t("Org"), None));
}

// ---------------------------------------------------------------------------
// Multiple
// ---------------------------------------------------------------------------

const LIST_FORM: &str = r#"
    @prefix ui: <http://www.w3.org/ns/ui#> .
    <#steps> a ui:Multiple ; ui:property <#step> ; ui:ordered true ; ui:part <#stepForm> .
    <#stepForm> a ui:SingleLineTextField ; ui:property <#name> .
"#;

#[test]
fn ordered_list_is_backfilled_to_minimum() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        <#steps> a ui:Multiple ; ui:property <#step> ; ui:ordered true ; ui:min 2 ;
            ui:part <#stepForm> .
        <#stepForm> a ui:SingleLineTextField ; ui:property <#name> .
        "#,
    );
    let widget = fx.render("recipe", "steps");
    let stored = fx.list("recipe", "step");
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0], stored[1]);
    assert_eq!(items(&widget).len(), 2);
    assert_eq!(fx.transport.requests().len(), 1);
}

#[test]
fn add_then_delete_restores_order() {
    let mut fx = Fixture::new(&format!("{LIST_FORM}\n<#recipe> <#step> ( <#a> <#b> ) ."));
    let widget = fx.render("recipe", "steps");
    assert_eq!(items(&widget).len(), 2);

    let add = widget
        .find_all(ElementKind::Button)
        .into_iter()
        .find(|b| b.text().starts_with("Add more"))
        .unwrap();
    add.click();
    fx.run();
    let grown = fx.list("recipe", "step");
    assert_eq!(grown.len(), 3);
    assert_eq!(&grown[..2], &[t("a"), t("b")]);

    let added = items(&widget)
        .into_iter()
        .find(|w| w.subject() == Some(grown[2].clone()))
        .unwrap();
    button(&added, "Delete").click();
    fx.run();
    assert_eq!(fx.list("recipe", "step"), vec![t("a"), t("b")]);
    assert_eq!(items(&widget).len(), 2);
}

#[test]
fn moves_past_either_end_change_nothing() {
    let mut fx = Fixture::new(&format!("{LIST_FORM}\n<#recipe> <#step> ( <#a> <#b> ) ."));
    let widget = fx.render("recipe", "steps");
    let rows = items(&widget);

    button(&rows[0], "Move Up").click();
    fx.run();
    button(&rows[1], "Move Down").click();
    fx.run();
    assert!(fx.transport.requests().is_empty());
    assert_eq!(widget.find_all(ElementKind::Notice).len(), 2);
    assert_eq!(fx.list("recipe", "step"), vec![t("a"), t("b")]);

    button(&rows[0], "Move Down").click();
    fx.run();
    assert_eq!(fx.list("recipe", "step"), vec![t("b"), t("a")]);
    let reordered: Vec<Option<Term>> = items(&widget).iter().map(|w| w.subject()).collect();
    assert_eq!(reordered, vec![Some(t("b")), Some(t("a"))]);
}

#[test]
fn unordered_items_are_plain_statements() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        <#friends> a ui:Multiple ; ui:property <#knows> ; ui:part <#nameField> .
        <#nameField> a ui:SingleLineTextField ; ui:property <#name> .
        <#me> <#knows> <#zed>, <#amy> .
        "#,
    );
    let widget = fx.render("me", "friends");
    let shown: Vec<Option<Term>> = items(&widget).iter().map(|w| w.subject()).collect();
    assert_eq!(shown, vec![Some(t("amy")), Some(t("zed"))]);

    button(&items(&widget)[1], "Delete").click();
    fx.run();
    assert!(!fx.graph.holds(&t("me"), n("knows").as_ref(), &t("zed"), None));
    assert_eq!(items(&widget).len(), 1);
}

#[test]
fn reverse_multiple_lists_subjects_pointing_here() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        <#members> a ui:Multiple ; ui:property <#memberOf> ; ui:reverse true ;
            ui:part <#nameField> .
        <#nameField> a ui:SingleLineTextField ; ui:property <#name> .
        <#bob> <#memberOf> <#team> .
        <#ann> <#memberOf> <#team> .
        "#,
    )
    .with_clock(42);
    let widget = fx.render("team", "members");
    let shown: Vec<Option<Term>> = items(&widget).iter().map(|w| w.subject()).collect();
    assert_eq!(shown, vec![Some(t("ann")), Some(t("bob"))]);

    let add = widget
        .find_all(ElementKind::Button)
        .into_iter()
        .find(|b| b.text().starts_with("Add more"))
        .unwrap();
    assert!(add.text().contains("is member of"));
    add.click();
    fx.run();
    let joined =
        fx.graph.holds(&t("id42"), n("memberOf").as_ref(), &t("team"), Some(fx.doc.as_ref()));
    assert!(joined);
    assert_eq!(items(&widget).len(), 3);

    button(&items(&widget)[1], "Delete").click();
    fx.run();
    assert!(!fx.graph.holds(&t("bob"), n("memberOf").as_ref(), &t("team"), None));
    assert!(fx.graph.holds(&t("ann"), n("memberOf").as_ref(), &t("team"), None));
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

#[test]
fn classifier_retracts_redundant_classes() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        <#Animal> owl:disjointUnionOf ( <#Cat> <#Dog> ) .
        <#Cat> rdfs:subClassOf <#Animal> ; owl:disjointUnionOf ( <#Persian> <#Siamese> ) .
        <#Dog> rdfs:subClassOf <#Animal> .
        <#Persian> rdfs:subClassOf <#Cat> .
        <#Siamese> rdfs:subClassOf <#Cat> .
        <#field> a ui:Classifier ; ui:category <#Animal> .
        <#tom> a <#Cat> .
        "#,
    );
    let is_a = |fx: &Fixture, class: &str| fx.graph.holds(&t("tom"), rdf::TYPE, &t(class), None);
    let widget = fx.render("tom", "field");
    let selects = widget.find_all(ElementKind::Select);
    assert_eq!(selects.len(), 2);
    assert_eq!(selects[0].selected_terms(), vec![t("Cat")]);
    assert_eq!(selects[1].options()[0].label, "--classify--");

    selects[1].choose(&[t("Siamese")]);
    fx.run();
    assert!(is_a(&fx, "Siamese"));
    assert!(!is_a(&fx, "Cat"));

    let top = widget.find_all(ElementKind::Select).remove(0);
    top.choose(&[t("Dog")]);
    fx.run();
    assert!(is_a(&fx, "Dog"));
    assert!(!is_a(&fx, "Siamese"));
}

// ---------------------------------------------------------------------------
// Autocomplete
// ---------------------------------------------------------------------------

#[test]
fn autocomplete_pick_replaces_every_value() {
    let mut fx = Fixture::new(
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        @prefix schema: <http://schema.org/> .
        <#field> a ui:AutocompleteField ; ui:property <#employer> ; ui:dataSource <#unis> .
        <#unis> ui:searchByNameURI "https://unis.example/?q=$(name)" ; ui:targetClass <#University> .
        <#mit> a <#University> ; schema:name "Massachusetts Institute of Technology" .
        <#eth> a <#University> ; schema:name "ETH Zurich" .
        <#me> <#employer> <#acme> .
        "#,
    );
    let other = NamedNode::new_unchecked("http://ex.org/other");
    let elsewhere = "<http://ex.org/d#me> <http://ex.org/d#employer> <http://ex.org/d#globex> .";
    fx.graph.load_turtle(elsewhere.as_bytes(), &other).unwrap();

    let widget = fx.render("me", "field");
    let input = widget.find_all(ElementKind::TextInput).remove(0);
    input.type_text("institute");
    input.commit();
    let results = widget.find_all(ElementKind::Select).remove(0);
    assert_eq!(results.options().len(), 2);

    results.choose(&[t("mit")]);
    fx.run();
    let employers = fx.graph.values(&t("me"), n("employer").as_ref());
    assert_eq!(employers, vec![t("mit")]);
    assert!(fx.graph.holds(&t("me"), n("employer").as_ref(), &t("mit"), Some(fx.doc.as_ref())));
}

// ---------------------------------------------------------------------------
// Fixtures on disk
// ---------------------------------------------------------------------------

#[test]
fn schema_and_config_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("forms.ttl");
    std::fs::write(
        &schema_path,
        r#"
        @prefix ui: <http://www.w3.org/ns/ui#> .
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        <#field> a ui:Classifier ; ui:category <#Vehicle> .
        <#Vehicle> owl:disjointUnionOf ( <#Car> <#Bike> ) .
        "#,
    )
    .unwrap();
    let config_path = dir.path().join("forms.toml");
    std::fs::write(&config_path, "classify_prompt = \"-- pick a kind --\"\n").unwrap();

    let doc = NamedNode::new_unchecked(DOC);
    let graph = Rc::new(MemoryGraph::new());
    assert_eq!(graph.load_file(&schema_path, &doc).unwrap(), 7);
    let config = FormsConfig::load(&config_path).unwrap();
    assert_eq!(config.unsequenced_weight, 9999);

    let mut pool = LocalPool::new();
    let (ctx, _) = FormContext::in_memory(graph.clone(), Rc::new(pool.spawner()));
    let ctx = ctx.with_config(config);
    let guard = RecursionGuard::new();
    let widget = append_form(&ctx, None, &guard, &t("ride"), &t("field"), &doc, ignore());
    pool.run_until_stalled();

    let select = widget.find_all(ElementKind::Select).remove(0);
    assert!(!select.is_multiple());
    let labels: Vec<String> = select.options().into_iter().map(|o| o.label).collect();
    assert_eq!(labels, vec!["-- pick a kind --", "car", "bike"]);

    select.choose(&[t("Bike")]);
    pool.run_until_stalled();
    assert!(graph.holds(&t("ride"), rdf::TYPE, &t("Bike"), None));
}
