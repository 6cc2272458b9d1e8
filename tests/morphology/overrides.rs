//! Integration tests for the override registry

use std::sync::{Arc, Mutex};

use fstlex_analyzer::{LibraryAnalyzer, MemoryTransducer};
use fstlex_foundation::{CONTEXT_EXPR, MapEntry, Tagset, Tagsets};
use fstlex_morphology::{
    GLOBAL, GeneratedParadigm, GenerationContextFormatter, GenerationRequest, Lemma, LemmatizeOptions, Morphology,
    OverrideRegistry, PostAnalysisProcessor, PregeneratedSelector, TagFilter,
};

fn seq(tags: &str) -> Vec<String> {
    tags.split('+').map(String::from).collect()
}

fn engine(overrides: OverrideRegistry) -> Morphology {
    let forward = MemoryTransducer::new()
        .with("dieđán", "diehtit+V+Ind+Prs+Sg1", 0.0)
        .with("dieđán", "dieđa+N+Sg+Nom", 1.0);
    let inverse = MemoryTransducer::new()
        .with("diehtit+V+Ind+Prs+Sg1", "dieđán", 0.0)
        .with("diehtit+V+Ind+Prs+Sg2", "dieđát", 0.0);
    let tagsets = Arc::new(Tagsets::new().with(Tagset::literals("pos", ["N", "V"])));
    Morphology::new("sme", tagsets, Box::new(LibraryAnalyzer::new(forward, Some(inverse))))
        .with_overrides(Arc::new(overrides))
}

struct OnlySingular;

impl TagFilter for OnlySingular {
    fn name(&self) -> &str {
        "only_singular"
    }

    fn filter(&self, mut request: GenerationRequest) -> GenerationRequest {
        request.tags.retain(|t| t.iter().any(|p| p.starts_with("Sg")));
        request
    }
}

struct Irregular;

impl PregeneratedSelector for Irregular {
    fn name(&self) -> &str {
        "irregular"
    }

    fn select(&self, request: &GenerationRequest) -> Option<Vec<GeneratedParadigm>> {
        (request.lemma == "leat").then(|| vec![GeneratedParadigm::new(["leat", "V", "Ind", "Prs", "Sg1"], vec!["lean".into()])])
    }
}

struct NounsOnly;

impl PostAnalysisProcessor for NounsOnly {
    fn name(&self) -> &str {
        "nouns_only"
    }

    fn process(&self, lemmas: Vec<Lemma>, _form: &str, _options: LemmatizeOptions) -> Vec<Lemma> {
        lemmas.into_iter().filter(|l| l.pos == "N").collect()
    }
}

/// Records every form the chain was run for.
#[derive(Clone, Default)]
struct Seen(Arc<Mutex<Vec<(String, usize)>>>);

impl PostAnalysisProcessor for Seen {
    fn name(&self) -> &str {
        "seen"
    }

    fn process(&self, lemmas: Vec<Lemma>, form: &str, _options: LemmatizeOptions) -> Vec<Lemma> {
        self.0.lock().unwrap().push((form.to_string(), lemmas.len()));
        lemmas
    }
}

#[test]
fn tag_filter_runs_before_generation() {
    let mut overrides = OverrideRegistry::new();
    overrides.register_tag_filter("sme", Arc::new(OnlySingular));
    let request = GenerationRequest::new("diehtit", vec![seq("V+Ind+Prs+Pl1"), seq("V+Ind+Prs+Sg2")]);

    let generated = engine(overrides).generate(&request);
    assert_eq!(generated.paradigm.len(), 1);
    assert_eq!(generated.paradigm[0].forms.as_deref(), Some(&["dieđát".to_string()][..]));
}

#[test]
fn selector_bypasses_the_generator() {
    let mut overrides = OverrideRegistry::new();
    overrides.register_pregenerated_selector("sme", Arc::new(Irregular));
    let engine = engine(overrides);

    let generated = engine.generate(&GenerationRequest::new("leat", vec![seq("V+Ind+Prs+Sg1")]));
    assert_eq!(generated.stdout, "pregenerated");
    assert_eq!(generated.paradigm[0].forms.as_deref(), Some(&["lean".to_string()][..]));

    let generated = engine.generate(&GenerationRequest::new("diehtit", vec![seq("V+Ind+Prs+Sg1")]));
    assert_ne!(generated.stdout, "pregenerated");
}

#[test]
fn selector_overrides_caller_forms() {
    let mut overrides = OverrideRegistry::new();
    overrides.register_pregenerated_selector("sme", Arc::new(Irregular));
    let supplied = vec![GeneratedParadigm::new(["leat", "V", "Ind", "Prs", "Sg1"], vec!["lea".into()])];
    let request = GenerationRequest::new("leat", vec![seq("V+Ind+Prs+Sg1")]).with_pregenerated(supplied);

    let generated = engine(overrides).generate(&request);
    assert_eq!(generated.paradigm[0].forms.as_deref(), Some(&["lean".to_string()][..]));
}

#[test]
fn empty_pregenerated_list_generates_normally() {
    let request = GenerationRequest::new("diehtit", vec![seq("V+Ind+Prs+Sg1")]).with_pregenerated(Vec::new());

    let generated = engine(OverrideRegistry::new()).generate(&request);
    assert_ne!(generated.stdout, "pregenerated");
    assert_eq!(generated.paradigm[0].forms.as_deref(), Some(&["dieđán".to_string()][..]));
}

#[test]
fn selectors_are_per_language() {
    let mut overrides = OverrideRegistry::new();
    overrides.register_pregenerated_selector("fin", Arc::new(Irregular));
    let generated = engine(overrides).generate(&GenerationRequest::new("leat", vec![seq("V+Ind+Prs+Sg1")]));
    assert_ne!(generated.stdout, "pregenerated");
}

#[test]
fn post_analysis_filters_lemmas() {
    let mut overrides = OverrideRegistry::new();
    assert!(overrides.register_post_analysis("sme", Arc::new(NounsOnly)));
    assert!(!overrides.register_post_analysis("sme", Arc::new(NounsOnly)));

    let lemmas = engine(overrides).lemmatize("dieđán", LemmatizeOptions::new());
    assert_eq!(lemmas.len(), 1);
    assert_eq!(lemmas[0].lemma, "dieđa");
}

#[test]
fn post_analysis_sees_unknown_forms() {
    let seen = Seen::default();
    let mut overrides = OverrideRegistry::new();
    overrides.register_post_analysis("sme", Arc::new(seen.clone()));
    let engine = engine(overrides);

    assert!(engine.lemmatize("qwerty", LemmatizeOptions::new()).is_empty());
    assert_eq!(engine.lemmatize("dieđán", LemmatizeOptions::new()).len(), 2);
    assert_eq!(
        *seen.0.lock().unwrap(),
        [("qwerty".to_string(), 0), ("dieđán".to_string(), 2)]
    );
}

#[test]
fn global_context_formatter() {
    let formatter = GenerationContextFormatter::new()
        .with_format("sme", None, "V+Ind+Prs+Sg1", "(mun) {word_form}")
        .with_format("sme", Some("gii"), "V+Ind+Prs+Sg1", "({context}) {word_form}");
    let mut overrides = OverrideRegistry::new();
    overrides.register_post_generation(GLOBAL, Arc::new(formatter));
    let engine = engine(overrides);

    let tags = vec![seq("V+Ind+Prs+Sg1"), seq("V+Ind+Prs+Sg2")];

    let plain = engine.generate(&GenerationRequest::new("diehtit", tags.clone()).with_node(Arc::new(MapEntry::new())));
    assert_eq!(plain.paradigm[0].forms.as_deref(), Some(&["(mun) dieđán".to_string()][..]));
    assert_eq!(plain.paradigm[1].forms.as_deref(), Some(&["dieđát".to_string()][..]));

    let node = MapEntry::new().with(CONTEXT_EXPR, "gii");
    let with_context = engine.generate(&GenerationRequest::new("diehtit", tags.clone()).with_node(Arc::new(node)));
    assert_eq!(with_context.paradigm[0].forms.as_deref(), Some(&["(gii) dieđán".to_string()][..]));

    let without_node = engine.generate(&GenerationRequest::new("diehtit", tags));
    assert_eq!(without_node.paradigm[0].forms.as_deref(), Some(&["dieđán".to_string()][..]));
}

#[test]
fn describe_lists_hooks() {
    let mut overrides = OverrideRegistry::new();
    overrides.register_tag_filter("sme", Arc::new(OnlySingular));
    overrides.register_pregenerated_selector("sme", Arc::new(Irregular));
    overrides.register_post_analysis("sme", Arc::new(NounsOnly));

    let described = overrides.describe("sme");
    assert_eq!(
        described,
        [
            ("tag filter", "only_singular".to_string()),
            ("pregenerated selector", "irregular".to_string()),
            ("post-analysis", "nouns_only".to_string()),
        ]
    );
    assert!(overrides.describe("fin").is_empty());
}
