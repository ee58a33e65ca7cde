use std::fs;

const DEFAULT_CONFIG: &str = "src/default_config.toml";

/// Every key `Config` reads, with the TOML type it deserializes from.
const FIELDS: [(&str, &str, &str); 8] = [
    ("document", "app_name", "string"),
    ("document", "font_family", "string"),
    ("document", "max_width", "string"),
    ("document", "text_color", "string"),
    ("document", "heading_color", "string"),
    ("links", "color", "string"),
    ("links", "underline", "boolean"),
    ("page", "numbers", "boolean"),
];

fn main() {
    println!("cargo:rerun-if-changed={DEFAULT_CONFIG}");

    let content = fs::read_to_string(DEFAULT_CONFIG)
        .unwrap_or_else(|e| panic!("cannot read {DEFAULT_CONFIG}: {e}"));

    let table = content
        .parse::<toml::Table>()
        .unwrap_or_else(|e| panic!("invalid {DEFAULT_CONFIG}: {e}"));

    // Every field must be spelled out with the right type so the embedded
    // defaults stay complete and always deserialize
    for (section, key, expected) in FIELDS {
        let Some(section_table) = table.get(section).and_then(toml::Value::as_table) else {
            panic!("{DEFAULT_CONFIG} is missing the [{section}] table");
        };
        let Some(value) = section_table.get(key) else {
            panic!("{DEFAULT_CONFIG} is missing {section}.{key}");
        };
        if value.type_str() != expected {
            panic!(
                "{DEFAULT_CONFIG}: {section}.{key} must be a {expected}, found a {}",
                value.type_str()
            );
        }
    }
}
