//! Weekly charts

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::client::{ApiRequest, LastfmClient};
use crate::error::{LastfmError, LastfmResult};
use crate::models::{Artist, Tag, User};
use crate::resource::Resource;
use crate::xml::XmlNode;

/// Convert unix seconds to a UTC datetime
pub fn timestamp_to_datetime(timestamp: i64) -> LastfmResult<DateTime<Utc>> {
    Utc.timestamp_opt(timestamp, 0).single().ok_or_else(|| {
        LastfmError::MalformedResponse(format!("timestamp {} is out of range", timestamp))
    })
}

/// Convert a UTC datetime to unix seconds
pub fn datetime_to_timestamp(datetime: &DateTime<Utc>) -> i64 {
    datetime.timestamp()
}

/// One week for which a chart is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeeklyChartTimeSpan {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl WeeklyChartTimeSpan {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Build a span from the `from`/`to` unix-second attributes of `node`
    fn from_attributes(node: &XmlNode) -> LastfmResult<Self> {
        Ok(Self {
            from: timestamp_to_datetime(node.parse_attr("from")?)?,
            to: timestamp_to_datetime(node.parse_attr("to")?)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyArtistChartItem {
    pub artist: Artist,
    pub rank: u32,
    pub playcount: u64,
    pub span: WeeklyChartTimeSpan,
}

/// Artist chart for one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyArtistChart {
    pub span: WeeklyChartTimeSpan,
    pub items: Vec<WeeklyArtistChartItem>,
}

impl WeeklyArtistChart {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeeklyArtistChartItem> {
        self.items.iter()
    }
}

impl IntoIterator for WeeklyArtistChart {
    type Item = WeeklyArtistChartItem;
    type IntoIter = std::vec::IntoIter<WeeklyArtistChartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Resources that publish weekly artist charts
pub trait WeeklyChartSource: Resource {}

impl WeeklyChartSource for Tag {}
impl WeeklyChartSource for User {}

fn parse_chart_list(doc: &XmlNode) -> LastfmResult<Vec<WeeklyChartTimeSpan>> {
    doc.descendants("chart")
        .into_iter()
        .map(WeeklyChartTimeSpan::from_attributes)
        .collect()
}

fn parse_artist_chart(doc: &XmlNode) -> LastfmResult<WeeklyArtistChart> {
    let chart = doc.require("weeklyartistchart")?;
    let span = WeeklyChartTimeSpan::from_attributes(chart)?;

    let items = chart
        .children_named("artist")
        .map(|node| {
            Ok(WeeklyArtistChartItem {
                artist: Artist::new(node.require_child_text("name")?),
                rank: node.parse_attr("rank")?,
                playcount: node.require_parse_child("playcount")?,
                span,
            })
        })
        .collect::<LastfmResult<Vec<_>>>()?;

    Ok(WeeklyArtistChart { span, items })
}

impl LastfmClient {
    /// Weeks for which `source` has charts (`*.getWeeklyChartList`)
    #[instrument(skip(self, source), fields(method = %source.method("getWeeklyChartList")))]
    pub async fn weekly_chart_spans<S: WeeklyChartSource>(
        &self,
        source: &S,
    ) -> LastfmResult<Vec<WeeklyChartTimeSpan>> {
        let request = ApiRequest::get(source.method("getWeeklyChartList"))
            .params(source.identity_params());
        let doc = self.execute(&request).await?;
        let spans = parse_chart_list(&doc)?;
        debug!(span_count = spans.len(), "Found weekly chart spans");
        Ok(spans)
    }

    /// Most recent weekly artist chart (`*.getWeeklyArtistChart`)
    #[instrument(skip(self, source), fields(method = %source.method("getWeeklyArtistChart")))]
    pub async fn weekly_artist_chart<S: WeeklyChartSource>(
        &self,
        source: &S,
    ) -> LastfmResult<WeeklyArtistChart> {
        let request = ApiRequest::get(source.method("getWeeklyArtistChart"))
            .params(source.identity_params());
        let doc = self.execute(&request).await?;
        parse_artist_chart(&doc)
    }

    /// Weekly artist chart for a specific week
    #[instrument(skip(self, source), fields(method = %source.method("getWeeklyArtistChart")))]
    pub async fn weekly_artist_chart_for<S: WeeklyChartSource>(
        &self,
        source: &S,
        span: &WeeklyChartTimeSpan,
    ) -> LastfmResult<WeeklyArtistChart> {
        let request = ApiRequest::get(source.method("getWeeklyArtistChart"))
            .params(source.identity_params())
            .param("from", datetime_to_timestamp(&span.from).to_string())
            .param("to", datetime_to_timestamp(&span.to).to_string());
        let doc = self.execute(&request).await?;
        parse_artist_chart(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_response;

    #[test]
    fn test_timestamp_round_trip() {
        let dt = timestamp_to_datetime(1_108_296_002).unwrap();
        assert_eq!(dt.to_rfc3339(), "2005-02-13T12:00:02+00:00");
        assert_eq!(datetime_to_timestamp(&dt), 1_108_296_002);
    }

    #[test]
    fn test_timestamp_out_of_range() {
        assert!(timestamp_to_datetime(i64::MAX).is_err());
    }

    #[test]
    fn test_parse_chart_list() {
        let doc = parse_response(
            r#"<lfm status="ok"><weeklychartlist tag="disco">
                <chart from="1108296002" to="1108900802"/>
                <chart from="1108900801" to="1109505601"/>
            </weeklychartlist></lfm>"#,
        )
        .unwrap();
        let spans = parse_chart_list(&doc).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(datetime_to_timestamp(&spans[1].from), 1_108_900_801);
        assert_eq!(datetime_to_timestamp(&spans[1].to), 1_109_505_601);
    }

    #[test]
    fn test_parse_chart_list_rejects_bad_timestamp() {
        let doc = parse_response(
            r#"<lfm status="ok"><weeklychartlist><chart from="yesterday" to="1"/></weeklychartlist></lfm>"#,
        )
        .unwrap();
        assert!(matches!(
            parse_chart_list(&doc),
            Err(LastfmError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_artist_chart() {
        let doc = parse_response(
            r#"<lfm status="ok"><weeklyartistchart tag="disco" from="1108296002" to="1108900802">
                <artist rank="1"><name>ABBA</name><mbid/><playcount>1234</playcount><url>https://www.last.fm/music/ABBA</url></artist>
                <artist rank="2"><name>Chic</name><playcount>99</playcount></artist>
            </weeklyartistchart></lfm>"#,
        )
        .unwrap();
        let chart = parse_artist_chart(&doc).unwrap();
        assert_eq!(chart.len(), 2);
        assert_eq!(datetime_to_timestamp(&chart.span.from), 1_108_296_002);
        let first = &chart.items[0];
        assert_eq!(first.artist.name, "ABBA");
        assert_eq!(first.rank, 1);
        assert_eq!(first.playcount, 1234);
        assert_eq!(first.span, chart.span);
        assert_eq!(chart.items[1].rank, 2);
    }

    #[test]
    fn test_parse_empty_artist_chart() {
        let doc = parse_response(
            r#"<lfm status="ok"><weeklyartistchart user="rj" from="1" to="2"/></lfm>"#,
        )
        .unwrap();
        let chart = parse_artist_chart(&doc).unwrap();
        assert!(chart.is_empty());
    }
}
