//! PHP built-in function names that global forwarders must never shadow.
//!
//! The set is a curated snapshot of the interpreter's internal functions
//! (a batch tool has no live PHP runtime to enumerate, so the list is fixed
//! data). Lookups are case-insensitive, matching PHP's function semantics.

use ahash::HashSet;
use once_cell::sync::Lazy;

static BUILTIN_FUNCTIONS: &[&str] = &[
  "abs", "addslashes", "array_chunk", "array_column", "array_combine", "array_diff",
  "array_diff_assoc", "array_diff_key", "array_fill", "array_fill_keys", "array_filter",
  "array_flip", "array_intersect", "array_intersect_key", "array_is_list", "array_key_exists",
  "array_key_first", "array_key_last", "array_keys", "array_map", "array_merge",
  "array_merge_recursive", "array_pad", "array_pop", "array_product", "array_push",
  "array_rand", "array_reduce", "array_reverse", "array_search", "array_shift", "array_slice",
  "array_splice", "array_sum", "array_unique", "array_unshift", "array_values", "array_walk",
  "array_walk_recursive", "arsort", "asin", "asort", "assert", "atan", "atan2", "base64_decode",
  "base64_encode", "base_convert", "basename", "bindec", "boolval", "call_user_func",
  "call_user_func_array", "ceil", "checkdate", "chgrp", "chmod", "chown", "chr", "chunk_split",
  "class_alias", "class_exists", "closedir", "compact", "constant", "copy", "cos", "count",
  "crc32", "crypt", "ctype_alnum", "ctype_alpha", "ctype_digit", "ctype_lower", "ctype_punct",
  "ctype_space", "ctype_upper", "ctype_xdigit", "curl_close", "curl_errno", "curl_error",
  "curl_exec", "curl_getinfo", "curl_init", "curl_setopt", "current", "date",
  "date_default_timezone_get", "date_default_timezone_set", "debug_backtrace",
  "debug_print_backtrace", "decbin", "dechex", "decoct", "define", "defined", "deg2rad",
  "dirname", "disk_free_space", "disk_total_space", "doubleval", "end", "enum_exists",
  "error_log", "error_reporting", "explode", "extract", "fclose", "feof", "fflush", "fgets",
  "file", "file_exists", "file_get_contents", "file_put_contents", "fileatime", "filectime",
  "filegroup", "filemtime", "fileowner", "fileperms", "filesize", "filetype", "filter_input",
  "filter_var", "floatval", "floor", "flush", "fmod", "fnmatch", "fopen", "fpassthru", "fread",
  "fseek", "ftell", "func_get_arg", "func_get_args", "func_num_args", "function_exists",
  "fwrite", "gc_collect_cycles", "get_called_class", "get_cfg_var", "get_class",
  "get_class_methods", "get_class_vars", "get_defined_constants", "get_defined_functions",
  "get_defined_vars", "get_object_vars", "get_parent_class", "getenv", "gethostbyaddr",
  "gethostbyname", "getrandmax", "gettype", "glob", "gmdate", "gmmktime", "hash", "hash_file",
  "hash_hmac", "header", "headers_list", "headers_sent", "hexdec", "html_entity_decode",
  "htmlentities", "htmlspecialchars", "htmlspecialchars_decode", "http_build_query",
  "http_response_code", "iconv", "implode", "in_array", "ini_get", "ini_restore", "ini_set",
  "intdiv", "interface_exists", "intval", "ip2long", "is_array", "is_bool", "is_callable",
  "is_countable", "is_dir", "is_double", "is_executable", "is_file", "is_float", "is_int",
  "is_integer", "is_iterable", "is_link", "is_null", "is_numeric", "is_object", "is_readable",
  "is_resource", "is_scalar", "is_string", "is_writable", "is_writeable", "iterator_count",
  "iterator_to_array", "join", "json_decode", "json_encode", "json_last_error",
  "json_last_error_msg", "key", "krsort", "ksort", "lcfirst", "levenshtein", "log", "log10",
  "log2", "long2ip", "ltrim", "max", "mb_convert_encoding", "mb_detect_encoding",
  "mb_internal_encoding", "mb_str_split", "mb_strlen", "mb_strpos", "mb_strtolower",
  "mb_strtoupper", "mb_substr", "md5", "md5_file", "memory_get_peak_usage", "memory_get_usage",
  "metaphone", "method_exists", "microtime", "min", "mkdir", "mktime", "mt_getrandmax",
  "mt_rand", "mt_srand", "natcasesort", "natsort", "next", "nl2br", "number_format",
  "ob_end_clean", "ob_end_flush", "ob_flush", "ob_get_clean", "ob_get_contents", "ob_start",
  "octdec", "opendir", "ord", "parse_str", "parse_url", "password_hash", "password_verify",
  "pathinfo", "phpversion", "php_sapi_name", "php_uname", "pi", "pow", "preg_grep",
  "preg_last_error", "preg_match", "preg_match_all", "preg_quote", "preg_replace",
  "preg_replace_callback", "preg_split", "prev", "print_r", "printf", "property_exists",
  "putenv", "quotemeta", "rad2deg", "rand", "random_bytes", "random_int", "range",
  "rawurldecode", "rawurlencode", "readdir", "realpath", "rename", "reset",
  "restore_error_handler", "restore_exception_handler", "rewind", "rewinddir", "rmdir", "round",
  "rsort", "rtrim", "scandir", "serialize", "session_destroy", "session_id", "session_name",
  "session_regenerate_id", "session_start", "set_error_handler", "set_exception_handler",
  "setcookie", "setrawcookie", "settype", "sha1", "sha1_file", "shuffle", "similar_text",
  "sin", "sizeof", "sleep", "sort", "soundex", "spl_autoload_register",
  "spl_autoload_unregister", "spl_object_hash", "spl_object_id", "sprintf", "sqrt", "srand",
  "sscanf", "stat", "str_contains", "str_ends_with", "str_ireplace", "str_pad", "str_repeat",
  "str_replace", "str_split", "str_starts_with", "str_word_count", "strcasecmp", "strcmp",
  "strip_tags", "stripos", "stripslashes", "stristr", "strlen", "strnatcasecmp", "strnatcmp",
  "strncasecmp", "strncmp", "strpos", "strrchr", "strrev", "strrpos", "strstr", "strtolower",
  "strtotime", "strtoupper", "strtr", "strval", "substr", "substr_count", "substr_replace",
  "sys_get_temp_dir", "tan", "tempnam", "time", "tmpfile", "touch", "trait_exists", "trigger_error",
  "trim", "uasort", "ucfirst", "ucwords", "uksort", "uniqid", "unlink", "unserialize",
  "urldecode", "urlencode", "usleep", "usort", "utf8_decode", "utf8_encode", "var_dump",
  "var_export", "version_compare", "vprintf", "vsprintf", "wordwrap",
];

static BUILTIN_SET: Lazy<HashSet<&'static str>> =
  Lazy::new(|| BUILTIN_FUNCTIONS.iter().copied().collect());

/// Whether `name` collides with a PHP built-in function, case-insensitively.
pub fn is_builtin_function(name: &str) -> bool {
  if BUILTIN_SET.contains(name) {
    return true;
  }
  let lower = name.to_ascii_lowercase();
  BUILTIN_SET.contains(lower.as_str())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detects_builtins_case_insensitively() {
    assert!(is_builtin_function("strlen"));
    assert!(is_builtin_function("StrLen"));
    assert!(is_builtin_function("ARRAY_MAP"));
  }

  #[test]
  fn passes_user_functions() {
    assert!(!is_builtin_function("wp_head"));
    assert!(!is_builtin_function("get_option"));
  }
}
