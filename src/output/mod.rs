pub mod formatter;

pub use formatter::{
    format_estimate, format_json, format_multiplier, format_salary, format_skill_table,
    format_thousands, format_tsv, format_warning, should_use_colors,
};
