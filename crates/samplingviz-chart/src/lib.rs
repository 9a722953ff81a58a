//! Interactive histogram charts over HTML table data.
//!
//! A [`page::Page`] loads every chart described by a [`config::PageConfig`]
//! from an HTML document. Each chart is a [`session::ChartSession`] that
//! reacts to pointer events and can be validated against exercises or
//! rendered with [`svg::render`].
//!
//! # Examples
//!
//! ```
//! use samplingviz_chart::{
//!     config::PageConfig,
//!     interaction::{PointerEvent, Target},
//!     page::Page,
//! };
//!
//! let html = r#"<table id="all-samples-fish"><tbody>
//!     <tr><td>41.2</td></tr><tr><td>43.9</td></tr><tr><td>44.4</td></tr>
//! </tbody></table>"#;
//! let mut config = PageConfig::default();
//! config.charts.retain(|c| c.id == "sampling-dist-fish");
//!
//! let mut page = Page::load(html, &config)?;
//! let chart = page.chart_mut("sampling-dist-fish").unwrap();
//! chart.dispatch(Target::Bin(0), PointerEvent::Click);
//! assert_eq!(chart.selected_bins(), [0]);
//! # Ok::<(), samplingviz_chart::page::PageError>(())
//! ```

pub mod axis;
pub mod collapsible;
pub mod config;
pub mod interaction;
pub mod page;
pub mod scale;
pub mod session;
pub mod svg;
pub mod table;
pub mod validate;
