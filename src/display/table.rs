use crate::api::models::{
    ImageResult, InsertError, InsertStatus, InsertTrans, PagedSearchGroupResult,
    PagedSearchResult,
};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use serde_json::Value;
use std::collections::BTreeSet;

const MAX_CELL_CHARS: usize = 60;

/// Formatter for search and data API results
pub struct TableDisplay {
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Set color usage
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    fn header(&self, labels: &[String]) -> Vec<Cell> {
        labels
            .iter()
            .map(|label| {
                if self.use_colors {
                    Cell::new(label)
                        .add_attribute(Attribute::Bold)
                        .fg(Color::Cyan)
                } else {
                    Cell::new(label).add_attribute(Attribute::Bold)
                }
            })
            .collect()
    }

    /// Render image results, one column per metadata field that occurs in
    /// any row.
    pub fn render_images(&self, images: &[ImageResult]) -> String {
        if images.is_empty() {
            return "No matching images.".to_string();
        }

        let fields: BTreeSet<&str> = images
            .iter()
            .flat_map(|image| image.metadata.keys().map(String::as_str))
            .collect();

        let mut labels = vec!["#".to_string(), "im_name".to_string(), "score".to_string()];
        labels.extend(fields.iter().map(|f| f.to_string()));

        let mut table = self.new_table();
        table.set_header(self.header(&labels));

        for (index, image) in images.iter().enumerate() {
            let mut row = vec![
                Cell::new(index + 1),
                if self.use_colors {
                    Cell::new(&image.im_name).fg(Color::Green)
                } else {
                    Cell::new(&image.im_name)
                },
                Cell::new(
                    image
                        .score
                        .map(|s| format!("{:.4}", s))
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ];
            for field in &fields {
                let value = image
                    .metadata
                    .get(*field)
                    .map(format_value)
                    .unwrap_or_else(|| "-".to_string());
                row.push(Cell::new(value));
            }
            table.add_row(row);
        }

        table.to_string()
    }

    pub fn render_search_result(&self, result: &PagedSearchResult) -> String {
        let mut output = self.render_images(&result.result);
        output.push('\n');
        output.push_str(&page_summary(result.page, result.limit, result.total));

        for facet in &result.facets {
            output.push_str(&format!("\nFacet '{}':", facet.key));
            for item in &facet.items {
                match item.count {
                    Some(count) => output.push_str(&format!(" {} ({})", item.value, count)),
                    None => output.push_str(&format!(" {}", item.value)),
                }
            }
            if let Some(range) = &facet.range {
                output.push_str(&format!(
                    " range {}..{}",
                    range.min.as_ref().map(format_value).unwrap_or_default(),
                    range.max.as_ref().map(format_value).unwrap_or_default()
                ));
            }
        }

        output
    }

    pub fn render_group_result(&self, result: &PagedSearchGroupResult) -> String {
        let mut sections = Vec::new();

        for object in &result.objects {
            let bbox = object
                .bounding_box
                .iter()
                .map(i32::to_string)
                .collect::<Vec<_>>()
                .join(",");
            sections.push(format!(
                "Object '{}' box [{}]\n{}",
                object.object_type.as_deref().unwrap_or("-"),
                bbox,
                self.render_images(&object.result)
            ));
        }

        let key = result.group_by_key.as_deref().unwrap_or("group");
        for group in &result.group_results {
            sections.push(format!(
                "{} = {}\n{}",
                key,
                group.group_by_value.as_deref().unwrap_or("-"),
                self.render_images(&group.result)
            ));
        }

        if sections.is_empty() {
            sections.push("No matching products.".to_string());
        }
        sections.push(page_summary(result.page, result.limit, result.total));
        sections.join("\n")
    }

    pub fn render_insert_trans(&self, trans: &InsertTrans) -> String {
        let mut output = format!(
            "Transaction: {}\nImages submitted: {}",
            trans.trans_id.as_deref().unwrap_or("-"),
            trans.total.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
        );
        if !trans.error_list.is_empty() {
            output.push('\n');
            output.push_str(&self.render_insert_errors(&trans.error_list));
        }
        output
    }

    pub fn render_insert_status(&self, status: &InsertStatus) -> String {
        let mut table = self.new_table();
        table.set_header(self.header(&["Field".to_string(), "Value".to_string()]));

        let optional = |v: Option<u32>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
        let rows = [
            ("trans_id", status.trans_id.clone().unwrap_or_else(|| "-".to_string())),
            ("processed", format!("{}%", optional(status.processed_percent))),
            ("total", optional(status.total)),
            ("success", optional(status.success_count)),
            ("failed", optional(status.fail_count)),
            (
                "started",
                status
                    .start_time
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            (
                "updated",
                status
                    .update_time
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ];
        for (field, value) in rows {
            table.add_row(vec![Cell::new(field), Cell::new(value)]);
        }

        let mut output = table.to_string();
        if !status.error_list.is_empty() {
            output.push('\n');
            output.push_str(&self.render_insert_errors(&status.error_list));
        }
        output
    }

    fn render_insert_errors(&self, errors: &[InsertError]) -> String {
        let mut table = self.new_table();
        table.set_header(self.header(&[
            "index".to_string(),
            "im_name".to_string(),
            "code".to_string(),
            "message".to_string(),
        ]));
        for error in errors {
            let message = error.error_message.as_deref().unwrap_or("-");
            table.add_row(vec![
                Cell::new(error.index.map(|i| i.to_string()).unwrap_or_default()),
                Cell::new(error.im_name.as_deref().unwrap_or("-")),
                Cell::new(error.error_code.map(|c| c.to_string()).unwrap_or_default()),
                if self.use_colors {
                    Cell::new(truncate_text(message, MAX_CELL_CHARS)).fg(Color::Red)
                } else {
                    Cell::new(truncate_text(message, MAX_CELL_CHARS))
                },
            ]);
        }
        table.to_string()
    }
}

fn page_summary(page: Option<u32>, limit: Option<u32>, total: Option<u32>) -> String {
    let show = |v: Option<u32>| v.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string());
    format!("Page {} (limit {}), {} total", show(page), show(limit), show(total))
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => truncate_text(s, MAX_CELL_CHARS),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
