//! Behaviour-driven tests for plugin compilation.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::StubBundler;
use crate::cache::ModuleCache;
use crate::compiler::PluginCompiler;
use crate::data_uri::{CompiledModule, DATA_URI_PREFIX};
use crate::error::CompileError;
use crate::options::BuildOptions;

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TestWorld {
    compiler: Option<PluginCompiler<StubBundler>>,
    outcome: Option<Result<CompiledModule, CompileError>>,
}

impl TestWorld {
    fn compiler(&self) -> &PluginCompiler<StubBundler> {
        self.compiler.as_ref().expect("no bundler configured")
    }

    fn module(&self) -> &CompiledModule {
        self.outcome
            .as_ref()
            .expect("nothing compiled")
            .as_ref()
            .expect("expected the compile to succeed")
    }

    fn error(&self) -> &CompileError {
        self.outcome
            .as_ref()
            .expect("nothing compiled")
            .as_ref()
            .expect_err("expected the compile to fail")
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

/// Parses whitespace-separated `KEY=VALUE` pairs.
fn parse_options(pairs: &str) -> BuildOptions {
    let mut options = BuildOptions::new();
    for pair in strip_quotes(pairs).split_whitespace() {
        options.extend(pair.parse().expect("option pair"));
    }
    options
}

fn compile(world: &RefCell<TestWorld>, path: &str, options: &BuildOptions) {
    let mut w = world.borrow_mut();
    let outcome = w.compiler().compile(strip_quotes(path), options);
    w.outcome = Some(outcome);
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("a bundler that emits {source}")]
fn given_emitting_bundler(world: &RefCell<TestWorld>, source: String) {
    let bundler = StubBundler::emitting(strip_quotes(&source));
    world.borrow_mut().compiler = Some(PluginCompiler::with_bundler(bundler));
}

#[given("a bundler that reports the error {text}")]
fn given_failing_bundler(world: &RefCell<TestWorld>, text: String) {
    let bundler = StubBundler::reporting(strip_quotes(&text));
    world.borrow_mut().compiler = Some(PluginCompiler::with_bundler(bundler));
}

#[given("a bundler that produces no output")]
fn given_silent_bundler(world: &RefCell<TestWorld>) {
    world.borrow_mut().compiler = Some(PluginCompiler::with_bundler(StubBundler::silent()));
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("plugin {path} is compiled")]
fn when_compiled(world: &RefCell<TestWorld>, path: String) {
    compile(world, &path, &BuildOptions::new());
}

#[when("plugin {path} is compiled with options {options}")]
fn when_compiled_with_options(world: &RefCell<TestWorld>, path: String, options: String) {
    compile(world, &path, &parse_options(&options));
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the module is a data URI")]
fn then_data_uri(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(w.module().as_str().starts_with(DATA_URI_PREFIX));
}

#[then("the module decodes to {source}")]
fn then_decodes_to(world: &RefCell<TestWorld>, source: String) {
    let w = world.borrow();
    assert_eq!(w.module().source().expect("decode"), strip_quotes(&source));
}

#[then("the compile fails with {message}")]
fn then_fails_with(world: &RefCell<TestWorld>, message: String) {
    let w = world.borrow();
    assert_eq!(w.error().to_string(), strip_quotes(&message));
}

#[then("the compile error mentions {text}")]
fn then_error_mentions(world: &RefCell<TestWorld>, text: String) {
    let w = world.borrow();
    let error = w.error().to_string();
    assert!(error.contains(strip_quotes(&text)), "{error}");
}

#[then("the bundler build count is {count}")]
fn then_build_count(world: &RefCell<TestWorld>, count: usize) {
    assert_eq!(world.borrow().compiler().bundler().calls(), count);
}

#[then("the cache size is {count}")]
fn then_cache_size(world: &RefCell<TestWorld>, count: usize) {
    assert_eq!(world.borrow().compiler().cache().len(), count);
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/plugin_compilation.feature",
    name = "A plugin compiles to a data URI"
)]
fn compiles_to_data_uri(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_compilation.feature",
    name = "Repeated compiles are served from the cache"
)]
fn repeated_compiles_cached(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_compilation.feature",
    name = "Option order does not affect caching"
)]
fn option_order_ignored(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_compilation.feature",
    name = "Different options compile separately"
)]
fn different_options_separate(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_compilation.feature",
    name = "Bundler errors fail the compile and are retried"
)]
fn bundler_errors_retried(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_compilation.feature",
    name = "A bundle without output fails the compile"
)]
fn empty_bundle_fails(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/plugin_compilation.feature",
    name = "Reserved options are rejected before bundling"
)]
fn reserved_options_rejected(world: RefCell<TestWorld>) {
    let _ = world;
}
