use std::path::PathBuf;

use clap::{ArgAction, Parser};
use search_core::{FilterSet, Msg, Section, SectionFilters};

#[derive(Debug, Parser)]
#[command(name = "docsearch")]
#[command(about = "Compose a faceted document search and print the hits", long_about = None)]
pub struct Cli {
    /// Document filter, e.g. `extension=pdf` or `templates=a,b`.
    #[arg(short = 'd', long = "document", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub document: Vec<Assignment>,
    /// Location filter, e.g. `locationId=42`.
    #[arg(short = 'l', long = "location", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub location: Vec<Assignment>,
    /// Packet filter, e.g. `projectId=7`.
    #[arg(short = 'p', long = "packet", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub packet: Vec<Assignment>,
    /// Adds one list row, e.g. `document.attributes:name=Color;value=red`.
    #[arg(long = "item", value_name = "SECTION.LIST:KEY=VALUE[;KEY=VALUE]", value_parser = parse_item)]
    pub items: Vec<ItemSpec>,
    /// Free-text query across all documents.
    #[arg(short = 'q', long = "query", default_value = "")]
    pub query: String,
    /// JSON preset with `document`, `location` and `packet` objects.
    #[arg(long)]
    pub filters: Option<PathBuf>,
    /// RON config file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub endpoint: Option<String>,
    #[arg(long)]
    pub system_id: Option<String>,
    /// Page size sent with the request.
    #[arg(long)]
    pub size: Option<u32>,
    /// Print the sanitized payload instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
    /// Print the hits as a JSON array.
    #[arg(long)]
    pub json: bool,
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub section: Section,
    pub list: String,
    pub values: Vec<Assignment>,
}

fn parse_assignment(raw: &str) -> Result<Assignment, String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{raw}`"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok(Assignment {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_item(raw: &str) -> Result<ItemSpec, String> {
    let (target, values) = raw.split_once(':').unwrap_or((raw, ""));
    let (section, list) = target
        .split_once('.')
        .ok_or_else(|| format!("expected SECTION.LIST, got `{target}`"))?;
    let section: Section = section.parse().map_err(|err| format!("{err}"))?;
    let values = values
        .split(';')
        .filter(|part| !part.trim().is_empty())
        .map(parse_assignment)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ItemSpec {
        section,
        list: list.trim().to_string(),
        values,
    })
}

impl Cli {
    /// Form edits in the order a user would make them: preset first, then
    /// field assignments, list rows and the general query.
    pub fn form_messages(&self, preset: Option<FilterSet>) -> Vec<Msg> {
        let mut msgs = Vec::new();
        let known = preset.clone().unwrap_or_default();
        if let Some(preset) = preset {
            msgs.push(Msg::FiltersLoaded(preset));
        }

        let assignments = [
            (Section::Document, &self.document),
            (Section::Location, &self.location),
            (Section::Packet, &self.packet),
        ];
        for (section, assignments) in assignments {
            for Assignment { field, value } in assignments {
                let msg = if known.section(section).is_list_field(field) {
                    Msg::ListFieldEdited {
                        section,
                        field: field.clone(),
                        raw: value.clone(),
                    }
                } else {
                    Msg::FieldEdited {
                        section,
                        field: field.clone(),
                        value: value.clone(),
                    }
                };
                msgs.push(msg);
            }
        }

        // Row indices continue after any rows the preset already has.
        let mut preset_rows = known;
        for item in &self.items {
            let index = preset_rows
                .section_mut(item.section)
                .add_item(&item.list)
                .unwrap_or(0);
            msgs.push(Msg::ItemAdded {
                section: item.section,
                list: item.list.clone(),
            });
            for Assignment { field, value } in &item.values {
                msgs.push(Msg::ItemEdited {
                    section: item.section,
                    list: item.list.clone(),
                    index,
                    key: field.clone(),
                    value: value.clone(),
                });
            }
        }

        if !self.query.is_empty() {
            msgs.push(Msg::GeneralQueryEdited(self.query.clone()));
        }
        msgs
    }
}
