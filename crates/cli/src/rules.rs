use cli_harness_core::ErrorCollector;

use crate::config::Rules;

/// Reports every rule `line` breaks.
pub fn check_line(rules: &Rules, errors: &mut ErrorCollector, line: &str) {
    if rules.forbid_tabs && line.contains('\t') {
        errors.add("Line contains a tab");
    }

    if rules.forbid_trailing_whitespace && line.ends_with([' ', '\t']) {
        errors.add("Line has trailing whitespace");
    }

    if let Some(limit) = rules.max_line_length {
        let length = line.chars().count();
        if length > limit {
            errors.add(format!(
                "Line is {length} characters long, the limit is {limit}"
            ));
        }
    }
}
