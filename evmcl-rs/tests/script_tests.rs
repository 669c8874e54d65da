//! End-to-end script tests: compile a script, run the composed action
//! against a recording mock host, and assert on the host calls and the
//! actions they built.

use std::sync::Mutex;

use futures_util::future::BoxFuture;

use evmcl::{compile, Action, ArgValue, Error, ExtensionRegistry, Host};

// ── Mock host ─────────────────────────────────────────────────────────────────

/// Records every factory call as a formatted string and returns one
/// synthetic [`Action`] per call, so both call order and action order are
/// observable.
struct MockHost {
    extensions: ExtensionRegistry<MockHost>,
    calls: Mutex<Vec<String>>,
}

impl MockHost {
    fn new() -> Self {
        let mut extensions = ExtensionRegistry::new();
        evmcl::ext::register_defaults(&mut extensions).unwrap();
        extensions.register("foo.bar", foo_bar).unwrap();
        extensions.register("fail", failing).unwrap();
        Self {
            extensions,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn fmt_params(params: &[ArgValue]) -> String {
    params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn foo_bar<'a>(host: &'a MockHost, params: Vec<String>) -> BoxFuture<'a, Result<String, Error>> {
    Box::pin(async move {
        host.record(format!("foo.bar({})", params.join(",")));
        Ok("0xBAR".to_owned())
    })
}

fn failing<'a>(_host: &'a MockHost, _p: Vec<String>) -> BoxFuture<'a, Result<String, Error>> {
    Box::pin(async move { Err(Error::extension("network down")) })
}

impl Host for MockHost {
    fn install(&self, identifier: &str, init_params: &[ArgValue]) -> Result<Vec<Action>, Error> {
        self.record(format!("install({identifier},[{}])", fmt_params(init_params)));
        Ok(vec![Action::new("kernel", format!("install:{identifier}"))])
    }

    fn grant(
        &self,
        grantee: &str,
        app: &str,
        role: &str,
        default_manager: &str,
    ) -> Result<Vec<Action>, Error> {
        self.record(format!("grant({grantee},{app},{role},{default_manager})"));
        Ok(vec![Action::new("acl", format!("grant:{role}"))])
    }

    fn revoke(
        &self,
        grantee: &str,
        app: &str,
        role: &str,
        remove_manager: Option<bool>,
    ) -> Result<Vec<Action>, Error> {
        self.record(format!("revoke({grantee},{app},{role},{remove_manager:?})"));
        Ok(vec![Action::new("acl", format!("revoke:{role}"))])
    }

    fn exec(&self, identifier: &str, method: &str, params: &[ArgValue]) -> Result<Vec<Action>, Error> {
        self.record(format!("exec({identifier}.{method}({}))", fmt_params(params)));
        Ok(vec![Action::new(identifier, format!("exec:{method}"))])
    }

    fn act(
        &self,
        agent: &str,
        target: &str,
        signature: &str,
        params: &[ArgValue],
    ) -> Result<Vec<Action>, Error> {
        self.record(format!("act({agent},{target},{signature},[{}])", fmt_params(params)));
        Ok(vec![Action::new(agent, format!("act:{signature}"))])
    }

    fn extensions(&self) -> &ExtensionRegistry<Self> {
        &self.extensions
    }

    fn caller_address(&self) -> Result<String, Error> {
        Ok("0xF00".to_owned())
    }

    fn chain_id(&self) -> u64 {
        1
    }
}

/// Compile and run a script against a fresh mock host, returning the host
/// and the run result.
async fn run(src: &str) -> (MockHost, Result<Vec<Action>, Error>) {
    let host = MockHost::new();
    let result = match compile(src) {
        Ok(program) => program.run(&host).await,
        Err(e) => Err(e),
    };
    (host, result)
}

// ── Compile-time behavior ─────────────────────────────────────────────────────

#[test]
fn comment_text_does_not_affect_parsing() {
    let base = compile("grant a b c d").unwrap();
    for commented in [
        "grant a b c d # grant it",
        "grant a b c d // grant it",
        "grant a b c d #// both markers",
    ] {
        assert_eq!(compile(commented).unwrap(), base);
    }
}

#[test]
fn unrecognized_command_rejects_whole_script() {
    // Well-formed lines precede the bad one; the script still compiles to
    // nothing and no host call can ever run.
    let err = compile("install voting\ngrant a b c d\nfrobnicate x").unwrap_err();
    assert!(matches!(err, Error::UnrecognizedCommand(name) if name == "frobnicate"));
}

// ── Environment ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_concatenates_resolved_values() {
    let (host, result) = run("set $x v1 v2\nexec app method $x").await;
    result.unwrap();
    assert_eq!(host.calls(), vec!["exec(app.method(v1v2))"]);
}

#[tokio::test]
async fn set_produces_no_host_call_and_no_action() {
    let (host, result) = run("set $a bar").await;
    assert_eq!(result.unwrap(), Vec::<Action>::new());
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn undefined_variable_aborts_before_any_host_call() {
    let (host, result) = run("exec app method $nope\ninstall voting").await;
    let err = result.unwrap_err();
    assert!(matches!(err, Error::UndefinedVariable(name) if name == "$nope"));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn failure_mid_script_keeps_earlier_calls_but_yields_no_actions() {
    let (host, result) = run("install voting\nexec app method $nope").await;
    assert!(result.is_err());
    // The first command ran to completion; the composed action still
    // surfaces only the error, never a partial action list.
    assert_eq!(host.calls(), vec!["install(voting,[])"]);
}

#[tokio::test]
async fn variables_resolve_in_script_order() {
    let (host, result) = run("set $a one\nset $b $a\nexec app m $b").await;
    result.unwrap();
    assert_eq!(host.calls(), vec!["exec(app.m(one))"]);
}

// ── revoke boolean coercion ───────────────────────────────────────────────────

#[tokio::test]
async fn revoke_bool_true() {
    let (host, result) = run("revoke a b c true").await;
    result.unwrap();
    assert_eq!(host.calls(), vec!["revoke(a,b,c,Some(true))"]);
}

#[tokio::test]
async fn revoke_bool_absent() {
    let (host, result) = run("revoke a b c").await;
    result.unwrap();
    assert_eq!(host.calls(), vec!["revoke(a,b,c,None)"]);
}

#[tokio::test]
async fn revoke_bool_invalid() {
    let (host, result) = run("revoke a b c maybe").await;
    assert!(matches!(result.unwrap_err(), Error::InvalidSyntax(_)));
    assert!(host.calls().is_empty());
}

// ── Extensions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn extension_invoked_with_host_and_params() {
    let (host, result) = run("exec app method @foo.bar(1,2)").await;
    result.unwrap();
    assert_eq!(
        host.calls(),
        vec!["foo.bar(1,2)", "exec(app.method(0xBAR))"]
    );
}

#[tokio::test]
async fn unknown_extension_fails() {
    let (host, result) = run("exec app method @foo.missing()").await;
    let err = result.unwrap_err();
    assert!(matches!(err, Error::UnknownExtension(path) if path == "foo.missing"));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn extension_failure_propagates() {
    let (_host, result) = run("exec app method @fail").await;
    let err = result.unwrap_err();
    assert!(matches!(err, Error::Extension(_)));
    assert_eq!(err.to_string(), "extension failed: network down");
}

#[tokio::test]
async fn builtin_sender_resolves_caller_address() {
    let (host, result) = run("set $me @sender\ngrant $me voting CREATE_VOTES_ROLE voting").await;
    result.unwrap();
    assert_eq!(
        host.calls(),
        vec!["grant(0xF00,voting,CREATE_VOTES_ROLE,voting)"]
    );
}

// ── Commands end to end ───────────────────────────────────────────────────────

#[tokio::test]
async fn sequential_scenario_in_script_order() {
    let (host, result) = run("install foo\nset $a bar\nexec foo baz $a").await;
    let actions = result.unwrap();
    assert_eq!(host.calls(), vec!["install(foo,[])", "exec(foo.baz(bar))"]);
    assert_eq!(
        actions,
        vec![
            Action::new("kernel", "install:foo"),
            Action::new("foo", "exec:baz"),
        ]
    );
}

#[tokio::test]
async fn install_passes_init_params_through() {
    let (host, result) = run("install token-manager 0x1 0 true").await;
    result.unwrap();
    assert_eq!(host.calls(), vec!["install(token-manager,[0x1,0,true])"]);
}

#[tokio::test]
async fn array_literals_keep_their_nesting() {
    let (host, result) = run("exec voting newVote [meta,[0x00,0x01]]").await;
    result.unwrap();
    assert_eq!(host.calls(), vec!["exec(voting.newVote([meta,[0x00,0x01]]))"]);
}

#[tokio::test]
async fn act_forwards_signature_and_params() {
    let (host, result) = run("act agent 0xT transfer(address,uint256) 0xA 100").await;
    result.unwrap();
    assert_eq!(
        host.calls(),
        vec!["act(agent,0xT,transfer(address,uint256),[0xA,100])"]
    );
}

#[tokio::test]
async fn grant_arity_is_checked() {
    let (host, result) = run("grant a b c").await;
    assert!(matches!(result.unwrap_err(), Error::InvalidSyntax(_)));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn run_twice_uses_a_fresh_environment() {
    let host = MockHost::new();
    let program = compile("set $a once\nexec app m $a").unwrap();
    program.run(&host).await.unwrap();
    program.run(&host).await.unwrap();
    assert_eq!(
        host.calls(),
        vec!["exec(app.m(once))", "exec(app.m(once))"]
    );
}
