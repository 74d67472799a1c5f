use std::fs;

use libhoogledb::{Config, Harvester, ModuleName, StaticDiscovery, StaticFetcher, Summary};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const BASE: &str = "http://www.frege-lang.org/doc";

const MAYBE_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>frege.data.Maybe</title></head>
<body>
<h1>Module <a href="#">frege.data.Maybe</a></h1>
<p>Functions for the <code>Maybe</code> type.<br>See also <a href="../Prelude.html#Maybe">Prelude</a>.</p>
<pre>
fromMaybe 0 (Just 3) == 3
x &lt; y &amp;&amp; y &gt; z
</pre>
<h3>Imports</h3>
<ul><li>frege.Prelude</li></ul>
<h3>Table of Content</h3>
<dl class="data">
<dt><a name="Maybe"></a><code><b>data</b> Maybe a = Nothing | Just a</code></dt>
<dd><p>Optional values.</p><dl class="func"><dt><a name="Maybe.Nothing"></a><code>Nothing</code></dt><dd><p>No value.</p></dd><dt><a name="Maybe.Just"></a><code>Just a</code></dt><dd><p>Some value.</p></dd></dl></dd>
<dt><a name="fromMaybe"></a><code>fromMaybe ∷ a → Maybe a → a</code></dt>
<dd><p>Extract the value or use <a href="#Maybe.Nothing">the default</a>.</p></dd>
<dt><a name="&lt;|&gt;"></a><code>&lt;|&gt; ∷ Maybe a → Maybe a → Maybe a</code></dt>
<dd></dd>
<dt><a name="Ref"></a><code>data Ref a = native java.util.concurrent.atomic.AtomicReference</code></dt>
</dl>
</body>
</html>
"##;

const EXPECTED: &str = "\
-- | Functions for the <code >Maybe</code> type.<br ></br>
--  See also <a href=\"http://www.frege-lang.org/doc/frege/data/../Prelude.html#Maybe\" >Prelude</a>.
--  <pre>
--  fromMaybe 0 (Just 3) == 3
--  x &lt; y &amp;&amp; y &gt; z
--\x20\x20
--  </pre>
module frege.data.Maybe

-- | Optional values.
--  <a name=\"Maybe.Nothing\" ></a><code >Nothing</code>
--\x20\x20
--  No value.
--  <a name=\"Maybe.Just\" ></a><code >Just a</code>
--\x20\x20
--  Some value.
@url http://www.frege-lang.org/doc/frege/data/Maybe#Maybe
data Maybe a = Nothing | Just a

-- | No value.
@url http://www.frege-lang.org/doc/frege/data/Maybe#Maybe.Nothing
Nothing

-- | Some value.
@url http://www.frege-lang.org/doc/frege/data/Maybe#Maybe.Just
Just a

-- | Extract the value or use <a href=\"http://www.frege-lang.org/doc/frege/data/Maybe#Maybe.Nothing\" >the default</a>.
@url http://www.frege-lang.org/doc/frege/data/Maybe#fromMaybe
fromMaybe ∷ a → Maybe a → a

@url http://www.frege-lang.org/doc/frege/data/Maybe#<|>
(<|>) ∷ Maybe a → Maybe a → Maybe a

@url http://www.frege-lang.org/doc/frege/data/Maybe#Ref
data Ref a\x20

";

fn run(discovered: &[&str], fetcher: &StaticFetcher) -> (String, Summary) {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("frege-hoogle-database.txt");
    let harvester =
        Harvester::new(Config::default().with_base_url(BASE).with_output(&output)).unwrap();
    let summary = harvester
        .run(&StaticDiscovery::new(discovered.iter().copied()), fetcher)
        .unwrap();
    (fs::read_to_string(&output).unwrap(), summary)
}

fn maybe_fetcher() -> StaticFetcher {
    StaticFetcher::new()
        .with_html(
            "http://www.frege-lang.org/doc/frege/data/Maybe.html",
            MAYBE_PAGE,
        )
        .unwrap()
}

#[test]
fn excluded_module_is_not_written() {
    let (text, summary) = run(&["frege.data.Maybe", "frege.compiler.Main"], &maybe_fetcher());
    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.selected, 1);
    assert_eq!(summary.written, vec![ModuleName::new("frege.data.Maybe")]);
    assert!(summary.failed.is_empty());
    assert_eq!(text.matches("\nmodule ").count(), 1);
    assert_eq!(text.matches("@url ").count(), 6);
}

#[test]
fn renders_complete_module_block() {
    let (text, _) = run(&["frege.data.Maybe"], &maybe_fetcher());
    assert_eq!(text, EXPECTED);
}

#[test]
fn nested_entries_keep_document_order() {
    let (text, _) = run(&["frege.data.Maybe"], &maybe_fetcher());
    let fragments: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("@url "))
        .map(|url| url.rsplit('#').next().unwrap())
        .collect();
    assert_eq!(
        fragments,
        vec!["Maybe", "Maybe.Nothing", "Maybe.Just", "fromMaybe", "<|>", "Ref"]
    );
}

#[test]
fn missing_pages_do_not_stop_the_run() {
    let (text, summary) = run(&["frege.Absent", "frege.data.Maybe"], &maybe_fetcher());
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].module, ModuleName::new("frege.Absent"));
    assert!(summary.failed[0].reason.contains("frege/Absent.html"));
    assert!(text.contains("module frege.data.Maybe\n"));
    assert!(!text.contains("frege.Absent"));
}

#[test]
fn no_modules_gives_empty_database() {
    let (text, summary) = run(&["frege.Version"], &StaticFetcher::new());
    assert_eq!(summary.selected, 0);
    assert_eq!(text, "");
}
