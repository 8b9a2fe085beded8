use std::fs;
use std::path::Path;
use std::path::PathBuf;
use transmute_php::pipeline::Options;
use transmute_php::reconcile::human_date;
use transmute_php::rewrite::Prefilter;
use transmute_php::rewrite::Rule;
use transmute_php::store::MappingDocument;

fn write_file(root: &Path, rel: &str, content: &str) {
  let path = root.join(rel);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, content).unwrap();
}

fn options(dir: &Path) -> Options {
  Options::new(dir.join("src"), dir.join("mappings.yaml")).with_out_dir(dir.join("build"))
}

fn read(path: impl AsRef<Path>) -> String {
  fs::read_to_string(path).unwrap()
}

#[test]
fn assigns_default_buckets_and_emits_artifacts() {
  let dir = tempfile::tempdir().unwrap();
  write_file(
    dir.path(),
    "src/a.php",
    "<?php\nfunction foo($x) {\n    return $x;\n}\nclass Bar {\n    public $v = 1;\n}\n",
  );
  transmute_php::run(&options(dir.path())).unwrap();

  let doc = MappingDocument::load(&dir.path().join("mappings.yaml")).unwrap();
  let foo = &doc.functions["foo"];
  assert_eq!(
    (foo.namespace.as_str(), foo.class.as_str(), foo.method.as_str()),
    ("App", "Misc", "foo")
  );
  let bar = &doc.classes["Bar"];
  assert_eq!((bar.namespace.as_str(), bar.class.as_str()), ("App", "Bar"));

  let misc = read(dir.path().join("build/app/Misc.php"));
  assert!(misc.contains("namespace App;"));
  assert!(misc.contains("public static function foo($x)"));
  let bar_unit = read(dir.path().join("build/app/Bar.php"));
  assert!(bar_unit.contains("class Bar"));
  let bindings = read(dir.path().join("build/bindings.php"));
  assert!(bindings.contains("function foo(...$args) {\n    return App\\Misc::foo(...$args);\n}"));
  assert!(bindings.contains("class_alias('App\\Bar', 'Bar');"));
}

#[test]
fn repeated_runs_are_idempotent() {
  let dir = tempfile::tempdir().unwrap();
  write_file(
    dir.path(),
    "src/one.php",
    "<?php\nfunction alpha() {\n    return 1;\n}\nclass First {\n}\n",
  );
  write_file(
    dir.path(),
    "src/two.php",
    "<?php\nfunction beta() {\n    return 2;\n}\n",
  );
  let opts = options(dir.path());
  transmute_php::run(&opts).unwrap();

  let snapshot = |root: &Path| -> Vec<(PathBuf, String)> {
    let mut files = vec![(root.join("mappings.yaml"), read(root.join("mappings.yaml")))];
    for entry in walk(root.join("build")) {
      files.push((entry.clone(), read(&entry)));
    }
    files.sort();
    files
  };
  let first = snapshot(dir.path());
  transmute_php::run(&opts).unwrap();
  let second = snapshot(dir.path());
  assert_eq!(first, second);

  let doc = MappingDocument::load(&dir.path().join("mappings.yaml")).unwrap();
  assert!(doc.outdated.functions.is_empty());
  assert!(doc.outdated.classes.is_empty());
}

fn walk(root: PathBuf) -> Vec<PathBuf> {
  let mut out = Vec::new();
  let mut stack = vec![root];
  while let Some(dir) = stack.pop() {
    for entry in fs::read_dir(dir).unwrap() {
      let path = entry.unwrap().path();
      if path.is_dir() {
        stack.push(path);
      } else {
        out.push(path);
      }
    }
  }
  out
}

#[test]
fn vanished_symbols_move_to_dated_archive() {
  let dir = tempfile::tempdir().unwrap();
  write_file(
    dir.path(),
    "mappings.yaml",
    "functions:\n  legacy:\n    namespace: App\n    class: Misc\n    method: legacy\nclasses:\n  Old_Thing:\n    namespace: App\n    class: OldThing\n",
  );
  write_file(dir.path(), "src/a.php", "<?php function kept() {}\n");
  transmute_php::run(&options(dir.path())).unwrap();

  let today = human_date(chrono::Local::now().date_naive());
  let doc = MappingDocument::load(&dir.path().join("mappings.yaml")).unwrap();
  assert!(!doc.functions.contains_key("legacy"));
  assert_eq!(doc.outdated.functions["legacy"].removed, today);
  assert!(!doc.classes.contains_key("Old_Thing"));
  assert_eq!(doc.outdated.classes["Old_Thing"].removed, today);
  assert!(doc.functions.contains_key("kept"));
}

#[test]
fn archive_survives_later_runs() {
  let dir = tempfile::tempdir().unwrap();
  write_file(
    dir.path(),
    "mappings.yaml",
    "outdated:\n  functions:\n    ancient:\n      namespace: App\n      class: Misc\n      method: ancient\n      removed: Oct 4th 2024\n",
  );
  write_file(dir.path(), "src/a.php", "<?php function current_fn() {}\n");
  transmute_php::run(&options(dir.path())).unwrap();

  let doc = MappingDocument::load(&dir.path().join("mappings.yaml")).unwrap();
  assert_eq!(doc.outdated.functions["ancient"].removed, "Oct 4th 2024");
}

#[test]
fn functions_sharing_a_target_class_merge_across_files() {
  let dir = tempfile::tempdir().unwrap();
  write_file(
    dir.path(),
    "mappings.yaml",
    concat!(
      "functions:\n",
      "  one:\n    namespace: App\\Util\n    class: Helpers\n    method: one\n",
      "  two:\n    namespace: App\\Util\n    class: Helpers\n    method: two\n",
      "  three:\n    namespace: App\\Util\n    class: Helpers\n    method: three\n",
    ),
  );
  write_file(
    dir.path(),
    "src/a.php",
    "<?php\nfunction one() {}\nfunction two() {}\n",
  );
  write_file(dir.path(), "src/b.php", "<?php\nfunction three() {}\n");
  transmute_php::run(&options(dir.path())).unwrap();

  let helpers = read(dir.path().join("build/app/Util/Helpers.php"));
  let one = helpers.find("function one").unwrap();
  let two = helpers.find("function two").unwrap();
  let three = helpers.find("function three").unwrap();
  assert!(one < two && two < three, "members keep first-discovered order");
}

#[test]
fn duplicate_classes_keep_first_seen_only() {
  let dir = tempfile::tempdir().unwrap();
  write_file(
    dir.path(),
    "src/a.php",
    "<?php\nclass Dup {\n    public function first_version() {}\n}\n",
  );
  write_file(
    dir.path(),
    "src/b.php",
    "<?php\nclass Dup {\n    public function second_version() {}\n}\n",
  );
  let report = transmute_php::run(&options(dir.path())).unwrap();

  let dup = read(dir.path().join("build/app/Dup.php"));
  assert!(dup.contains("first_version"));
  assert!(!dup.contains("second_version"));
  let dup_units: Vec<_> = report
    .generated
    .iter()
    .filter(|p| p.ends_with("Dup.php"))
    .collect();
  assert_eq!(dup_units.len(), 1);
}

#[test]
fn hand_edited_mappings_steer_output_and_survive() {
  let dir = tempfile::tempdir().unwrap();
  write_file(
    dir.path(),
    "mappings.yaml",
    "functions:\n  greet:\n    namespace: App\\Greetings\n    class: Hello\n    method: hi\n",
  );
  write_file(dir.path(), "src/a.php", "<?php\nfunction greet() {\n    return 'hey';\n}\n");
  transmute_php::run(&options(dir.path())).unwrap();

  let doc = MappingDocument::load(&dir.path().join("mappings.yaml")).unwrap();
  let greet = &doc.functions["greet"];
  assert_eq!(greet.class, "Hello");
  assert_eq!(greet.method, "hi");
  let hello = read(dir.path().join("build/app/Greetings/Hello.php"));
  assert!(hello.contains("public static function hi()"));
  let bindings = read(dir.path().join("build/bindings.php"));
  assert!(bindings.contains(
    "function greet(...$args) {\n    return App\\Greetings\\Hello::hi(...$args);\n}"
  ));
}

#[test]
fn builtin_names_are_mapped_but_not_shimmed() {
  let dir = tempfile::tempdir().unwrap();
  write_file(dir.path(), "src/a.php", "<?php\nfunction strlen($s) {}\nfunction mine() {}\n");
  transmute_php::run(&options(dir.path())).unwrap();

  let doc = MappingDocument::load(&dir.path().join("mappings.yaml")).unwrap();
  assert!(doc.functions.contains_key("strlen"));
  let bindings = read(dir.path().join("build/bindings.php"));
  assert!(!bindings.contains("function strlen"));
  assert!(bindings.contains("function mine"));
}

#[test]
fn forward_base_references_resolve_after_full_scan() {
  let dir = tempfile::tempdir().unwrap();
  // Sorted walk scans the child before its base is discovered.
  write_file(
    dir.path(),
    "src/a_child.php",
    "<?php\nclass Child_Widget extends Widget_Base {\n}\n",
  );
  write_file(dir.path(), "src/z_base.php", "<?php\nclass Widget_Base {\n}\n");
  transmute_php::run(&options(dir.path())).unwrap();

  let child = read(dir.path().join("build/app/Child_Widget.php"));
  assert!(child.contains("class Child_Widget extends \\App\\Widget_Base"));
}

#[test]
fn parse_failures_skip_the_file_but_not_the_run() {
  let dir = tempfile::tempdir().unwrap();
  write_file(dir.path(), "src/bad.php", "<?php function broken() { if (true) {\n");
  write_file(dir.path(), "src/good.php", "<?php function fine() {}\n");
  let report = transmute_php::run(&options(dir.path())).unwrap();

  assert_eq!(report.parse_failures.len(), 1);
  assert!(report.parse_failures[0].path.ends_with("bad.php"));
  let doc = MappingDocument::load(&dir.path().join("mappings.yaml")).unwrap();
  assert!(doc.functions.contains_key("fine"));
  assert!(!doc.functions.contains_key("broken"));
}

#[test]
fn excludes_and_prefilter_apply_before_parsing() {
  let dir = tempfile::tempdir().unwrap();
  write_file(dir.path(), "src/vendor/lib.php", "<?php function vendored() {}\n");
  write_file(
    dir.path(),
    "src/app.php",
    "<?php\nrequire ABSPATH . 'setup.php';\nfunction branded() {\n    return 'WordPress';\n}\n",
  );
  let opts = options(dir.path())
    .with_excludes(vec!["vendor/".to_owned()])
    .with_prefilter(Prefilter::new(vec![
      Rule::comment_out(r"\brequire(?:_once)?\s+ABSPATH\b").unwrap(),
      Rule::replace("WordPress", "App"),
    ]));
  transmute_php::run(&opts).unwrap();

  let doc = MappingDocument::load(&dir.path().join("mappings.yaml")).unwrap();
  assert!(!doc.functions.contains_key("vendored"));
  let misc = read(dir.path().join("build/app/Misc.php"));
  assert!(misc.contains("return 'App';"));
}
