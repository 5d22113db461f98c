//! Crate-level integration and BDD tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::bundler::{BuildMessage, BuildRequest, BuildResult, Bundler, OutputFile};
use crate::cache::ModuleCache;
use crate::compiler::PluginCompiler;
use crate::error::CompileError;
use crate::options::BuildOptions;

mod behaviour;

/// Outcome a [`StubBundler`] reports for every build.
#[derive(Debug, Clone)]
enum Script {
    Emit(String),
    Fail(String),
    Nothing,
}

/// Bundler double that counts builds and remembers the last request.
#[derive(Debug)]
pub(crate) struct StubBundler {
    script: Script,
    calls: AtomicUsize,
    last_request: Mutex<Option<BuildRequest>>,
}

impl StubBundler {
    fn scripted(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Emits one artifact containing `source`.
    pub(crate) fn emitting(source: impl Into<String>) -> Self {
        Self::scripted(Script::Emit(source.into()))
    }

    /// Reports a single build error.
    pub(crate) fn reporting(error: impl Into<String>) -> Self {
        Self::scripted(Script::Fail(error.into()))
    }

    /// Succeeds without producing any artifact.
    pub(crate) fn silent() -> Self {
        Self::scripted(Script::Nothing)
    }

    /// Number of builds run so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request, if any.
    pub(crate) fn last_request(&self) -> Option<BuildRequest> {
        self.last_request.lock().expect("request lock").clone()
    }
}

impl Bundler for StubBundler {
    fn build(&self, request: &BuildRequest) -> Result<BuildResult, CompileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().expect("request lock") = Some(request.clone());
        Ok(match &self.script {
            Script::Emit(source) => {
                BuildResult::success(vec![OutputFile::new("out/plugin.js", source.clone())])
            }
            Script::Fail(error) => BuildResult::failure(vec![BuildMessage::new(error.clone())]),
            Script::Nothing => BuildResult::success(Vec::new()),
        })
    }
}

#[test]
fn end_to_end_compile_with_stub() {
    let bundler = StubBundler::emitting("export default { init() {} };");
    let compiler = PluginCompiler::with_bundler(bundler);
    let options = BuildOptions::new().with("minify", true);

    let module = compiler
        .compile("plugins/auth.js", &options)
        .expect("compile");
    assert_eq!(
        module.source().expect("decode"),
        "export default { init() {} };"
    );

    let request = compiler.bundler().last_request().expect("request seen");
    assert_eq!(request.get("minify"), Some(&serde_json::json!(true)));
    assert_eq!(request.format(), Some("esm"));

    compiler
        .compile("plugins/auth.js", &options)
        .expect("cached compile");
    assert_eq!(compiler.bundler().calls(), 1);
    assert_eq!(compiler.cache().len(), 1);
}

#[test]
fn compiles_from_many_threads() {
    let compiler = PluginCompiler::with_bundler(StubBundler::emitting("export {};"));

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let module = compiler
                    .compile("plugins/auth.js", &BuildOptions::new())
                    .expect("compile");
                assert_eq!(module.source().expect("decode"), "export {};");
            });
        }
    });

    assert_eq!(compiler.cache().len(), 1);
    assert!((1..=4).contains(&compiler.bundler().calls()));
}
