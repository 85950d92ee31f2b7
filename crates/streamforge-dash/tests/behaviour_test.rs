//! Behavioural tests for the DASH parser: inheritance across levels, segment
//! expansion and the dispatch order of configuration hooks.

use std::sync::{Arc, Mutex};
use streamforge_dash::{
    parse, CustomValue, DashParserConfig, DebugEvent, Diagnostic, DiagnosticKind, Error,
    FullManifestParser, ParseOptions, PresentationType, ProgressiveManifestParser,
};

const BASE: &str = "https://cdn.example/dash/manifest.mpd";

fn collecting() -> (FullManifestParser, Arc<Mutex<Vec<Diagnostic>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let config = DashParserConfig::builder()
        .warn_callback(move |d| sink.lock().unwrap().push(d.clone()))
        .build();
    (FullManifestParser::new(config), seen)
}

fn diagnostics_of(input: &str) -> Vec<Diagnostic> {
    let (parser, seen) = collecting();
    parser.parse(input, &ParseOptions::new(BASE)).unwrap();
    let seen = seen.lock().unwrap();
    seen.clone()
}

#[test]
fn test_defaults_of_empty_mpd() {
    let manifest = parse("<MPD/>", BASE).unwrap();
    assert_eq!(manifest.presentation_type, PresentationType::Static);
    assert!(!manifest.is_dynamic());
    assert!(manifest.periods.is_empty());
    assert!(manifest.base_urls.is_empty());
    assert!(manifest.custom.is_empty());
    assert_eq!(manifest.media_presentation_duration, None);
}

#[test]
fn test_invalid_presentation_type() {
    let (parser, seen) = collecting();
    let manifest = parser
        .parse(r#"<MPD type="live"/>"#, &ParseOptions::new(BASE))
        .unwrap();
    assert_eq!(manifest.presentation_type, PresentationType::Static);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Diagnostic::InvalidEnumValue {
            tag: "MPD".into(),
            value: "live".into(),
            allowed: vec!["static".into(), "dynamic".into()],
        }]
    );
}

#[test]
fn test_unparsable_duration_warns() {
    let (parser, seen) = collecting();
    let manifest = parser
        .parse(
            r#"<MPD mediaPresentationDuration="ten seconds" minBufferTime="PT2S"/>"#,
            &ParseOptions::new(BASE),
        )
        .unwrap();
    assert_eq!(manifest.media_presentation_duration, None);
    assert_eq!(manifest.min_buffer_time, Some(2.0));
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind(), DiagnosticKind::SkipTag);
}

#[test]
fn test_missing_required_attribute_skips_subtree() {
    let input = r#"<MPD><Period><AdaptationSet>
        <Representation id="v1"><BaseURL>v1/</BaseURL></Representation>
        <Representation id="v2" bandwidth="500000"/>
    </AdaptationSet></Period></MPD>"#;
    let (parser, seen) = collecting();
    let manifest = parser.parse(input, &ParseOptions::new(BASE)).unwrap();

    let ids: Vec<&str> = manifest.representations().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["v2"]);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Diagnostic::MissingRequiredAttribute {
            tag: "Representation".into(),
            attribute: "bandwidth".into(),
        }]
    );
}

#[test]
fn test_unparsable_bandwidth_rejects_representation() {
    let diagnostics = diagnostics_of(
        r#"<MPD><Period><AdaptationSet><Representation id="v" bandwidth="fast"/></AdaptationSet></Period></MPD>"#,
    );
    assert_eq!(
        diagnostics,
        vec![Diagnostic::UnparsableValue {
            tag: "Representation".into(),
            value: "bandwidth=fast".into(),
        }]
    );
}

#[test]
fn test_period_start_follows_previous_period() {
    let manifest = parse(
        r#"<MPD>
            <Period id="a" duration="PT10S"/>
            <Period id="b" duration="PT5S"/>
            <Period id="c" start="PT30S"/>
            <Period id="d"/>
        </MPD>"#,
        BASE,
    )
    .unwrap();
    let starts: Vec<f64> = manifest.periods.iter().map(|p| p.start).collect();
    assert_eq!(starts, vec![0.0, 10.0, 30.0, 30.0]);
    assert_eq!(manifest.periods[1].end(), Some(15.0));
    assert_eq!(manifest.periods[3].end(), None);
}

#[test]
fn test_base_urls_resolve_per_level() {
    let input = r#"<MPD>
      <BaseURL>https://a.example/root/</BaseURL>
      <BaseURL>https://b.example/mirror/</BaseURL>
      <Period duration="PT4S">
        <BaseURL>period/</BaseURL>
        <AdaptationSet>
          <BaseURL>video/</BaseURL>
          <SegmentTemplate duration="2" media="$Number$.m4s"/>
          <Representation id="r" bandwidth="1"/>
        </AdaptationSet>
      </Period>
    </MPD>"#;
    let manifest = parse(input, BASE).unwrap();

    assert_eq!(
        manifest.base_urls,
        vec!["https://a.example/root/", "https://b.example/mirror/"]
    );
    assert_eq!(manifest.periods[0].base_url, "https://a.example/root/period/");
    let representation = manifest.representations().next().unwrap();
    assert_eq!(representation.base_url, "https://a.example/root/period/video/");
    let uris: Vec<&str> = representation
        .segments
        .iter()
        .map(|s| s.resolved_uri.as_str())
        .collect();
    assert_eq!(
        uris,
        vec![
            "https://a.example/root/period/video/1.m4s",
            "https://a.example/root/period/video/2.m4s",
        ]
    );
}

#[test]
fn test_representation_inherits_adaptation_set_attributes() {
    let manifest = parse(
        r#"<MPD><Period><AdaptationSet mimeType="video/mp4" codecs="avc1.640028" width="1920" frameRate="25">
            <Representation id="a" bandwidth="1" height="1080"/>
            <Representation id="b" bandwidth="2" codecs="hvc1.1.6.L120.90" frameRate="50"/>
        </AdaptationSet></Period></MPD>"#,
        BASE,
    )
    .unwrap();
    let representations: Vec<_> = manifest.representations().collect();
    assert_eq!(representations[0].mime_type.as_deref(), Some("video/mp4"));
    assert_eq!(representations[0].codecs.as_deref(), Some("avc1.640028"));
    assert_eq!(representations[0].width, Some(1920));
    assert_eq!(representations[0].height, Some(1080));
    assert_eq!(representations[0].frame_rate, Some(25.0));
    assert_eq!(representations[1].codecs.as_deref(), Some("hvc1.1.6.L120.90"));
    assert_eq!(representations[1].frame_rate, Some(50.0));
    assert_eq!(representations[1].height, None);
}

#[test]
fn test_representation_template_overrides_one_attribute() {
    let manifest = parse(
        r#"<MPD mediaPresentationDuration="PT6S"><Period><AdaptationSet>
            <SegmentTemplate timescale="10" duration="20" media="$RepresentationID$-$Number$.m4s"/>
            <Representation id="lo" bandwidth="1"/>
            <Representation id="hi" bandwidth="2"><SegmentTemplate startNumber="100"/></Representation>
        </AdaptationSet></Period></MPD>"#,
        BASE,
    )
    .unwrap();
    let uris: Vec<Vec<&str>> = manifest
        .representations()
        .map(|r| r.segments.iter().map(|s| s.uri.as_str()).collect())
        .collect();
    assert_eq!(
        uris,
        vec![
            vec!["lo-1.m4s", "lo-2.m4s", "lo-3.m4s"],
            vec!["hi-100.m4s", "hi-101.m4s", "hi-102.m4s"],
        ]
    );
}

#[test]
fn test_base_time_offsets_segments() {
    let manifest = FullManifestParser::default()
        .parse(
            r#"<MPD><Period start="PT10S" duration="PT4S"><AdaptationSet>
                <SegmentTemplate duration="2" media="$Number$.m4s"/>
                <Representation id="r" bandwidth="1"/>
            </AdaptationSet></Period></MPD>"#,
            &ParseOptions::new(BASE).with_base_time(100.0),
        )
        .unwrap();
    let times: Vec<(f64, f64)> = manifest
        .representations()
        .flat_map(|r| &r.segments)
        .map(|s| (s.start_time, s.end_time))
        .collect();
    assert_eq!(times, vec![(110.0, 112.0), (112.0, 114.0)]);
}

#[test]
fn test_open_ended_repeat_without_period_end() {
    let input = r#"<MPD type="dynamic"><Period><AdaptationSet>
        <SegmentTemplate media="$Time$.m4s"><SegmentTimeline><S t="0" d="2" r="-1"/></SegmentTimeline></SegmentTemplate>
        <Representation id="r" bandwidth="1"/>
    </AdaptationSet></Period></MPD>"#;
    let (parser, seen) = collecting();
    let manifest = parser.parse(input, &ParseOptions::new(BASE)).unwrap();

    assert_eq!(manifest.representations().next().unwrap().segments.len(), 1);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind(), DiagnosticKind::Advisory);
}

#[test]
fn test_unparsable_timeline_entry_is_dropped() {
    let input = r#"<MPD mediaPresentationDuration="PT4S"><Period><AdaptationSet>
        <SegmentTemplate media="$Time$.m4s"><SegmentTimeline>
          <S t="0" d="x"/>
          <S t="0" d="2" r="1"/>
        </SegmentTimeline></SegmentTemplate>
        <Representation id="r" bandwidth="1"/>
    </AdaptationSet></Period></MPD>"#;
    let (parser, seen) = collecting();
    let manifest = parser.parse(input, &ParseOptions::new(BASE)).unwrap();

    let uris: Vec<&str> = manifest
        .representations()
        .flat_map(|r| &r.segments)
        .map(|s| s.uri.as_str())
        .collect();
    assert_eq!(uris, vec!["0.m4s", "2.m4s"]);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Diagnostic::UnparsableValue {
            tag: "S".into(),
            value: "d=x".into(),
        }]
    );
}

#[test]
fn test_event_message_from_cdata_and_entities() {
    let manifest = parse(
        r#"<MPD><Period>
            <EventStream schemeIdUri="urn:example:events" timescale="10">
              <Event id="1" presentationTime="25"><![CDATA[<cue id="a"/>]]></Event>
              <Event id="2" presentationTime="40" messageData="x &lt; y"/>
            </EventStream>
        </Period></MPD>"#,
        BASE,
    )
    .unwrap();
    let events = &manifest.periods[0].event_streams[0].events;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].presentation_time, 2.5);
    assert_eq!(events[0].message_data.as_deref(), Some(r#"<cue id="a"/>"#));
    assert_eq!(events[1].message_data.as_deref(), Some("x < y"));
}

#[test]
fn test_unsupported_element_skips_subtree() {
    let input = r#"<MPD><Period>
        <Subset contains="1 2"><AdaptationSet id="hidden"/></Subset>
        <AdaptationSet id="visible"/>
    </Period></MPD>"#;
    let (parser, seen) = collecting();
    let manifest = parser.parse(input, &ParseOptions::new(BASE)).unwrap();

    let ids: Vec<Option<&str>> = manifest.periods[0]
        .adaptation_sets
        .iter()
        .map(|a| a.id.as_deref())
        .collect();
    assert_eq!(ids, vec![Some("visible")]);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Diagnostic::UnsupportedTag { tag: "Subset".into() }]
    );
}

#[test]
fn test_ignored_element_skips_processing() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let config = DashParserConfig::builder()
        .ignore_tag("ContentProtection")
        .warn_callback(move |d| sink.lock().unwrap().push(d.clone()))
        .build();
    let manifest = FullManifestParser::new(config)
        .parse(
            r#"<MPD><Period><AdaptationSet>
                <ContentProtection schemeIdUri="urn:uuid:1"><cenc:pssh>AAAA</cenc:pssh></ContentProtection>
            </AdaptationSet></Period></MPD>"#,
            &ParseOptions::new(BASE),
        )
        .unwrap();

    assert!(manifest.periods[0].adaptation_sets[0]
        .content_protections
        .is_empty());
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Diagnostic::IgnoredTag {
            tag: "ContentProtection".into()
        }]
    );
}

#[test]
fn test_custom_element_writes_custom_bag() {
    let config = DashParserConfig::builder()
        .custom_tag("SupplementalProperty", |element, custom, state| {
            let value = element
                .attributes
                .and_then(|a| a.get("value"))
                .cloned()
                .unwrap_or_default();
            custom.insert("switching".into(), CustomValue::Text(value));
            custom.insert(
                "inside-adaptation-set".into(),
                CustomValue::Flag(state.current_adaptation_set.is_some()),
            );
            Ok(())
        })
        .build();
    let manifest = FullManifestParser::new(config)
        .parse(
            r#"<MPD><Period><AdaptationSet>
                <SupplementalProperty schemeIdUri="urn:mpeg:dash:adaptation-set-switching:2016" value="1,2"/>
            </AdaptationSet></Period></MPD>"#,
            &ParseOptions::new(BASE),
        )
        .unwrap();

    assert_eq!(
        manifest.custom.get("switching"),
        Some(&CustomValue::Text("1,2".into()))
    );
    assert_eq!(
        manifest.custom.get("inside-adaptation-set"),
        Some(&CustomValue::Flag(true))
    );
}

#[test]
fn test_builtin_elements_win_over_custom_handlers() {
    let config = DashParserConfig::builder()
        .custom_tag("Period", |_, custom, _| {
            custom.insert("hijacked".into(), CustomValue::Flag(true));
            Ok(())
        })
        .build();
    let manifest = FullManifestParser::new(config)
        .parse(r#"<MPD><Period id="p"/></MPD>"#, &ParseOptions::new(BASE))
        .unwrap();
    assert_eq!(manifest.periods.len(), 1);
    assert!(manifest.custom.is_empty());
}

#[test]
fn test_transform_attributes_run_before_processing() {
    let config = DashParserConfig::builder()
        .transform_tag_attributes(|key, attributes| {
            let mut attributes = attributes.clone();
            if key == "Representation" {
                attributes.insert("bandwidth".into(), "42".into());
            }
            Ok(attributes)
        })
        .build();
    let manifest = FullManifestParser::new(config)
        .parse(
            r#"<MPD><Period><AdaptationSet><Representation id="r" bandwidth="1000"/></AdaptationSet></Period></MPD>"#,
            &ParseOptions::new(BASE),
        )
        .unwrap();
    assert_eq!(manifest.representations().next().unwrap().bandwidth, 42);
}

#[test]
fn test_hook_error_aborts_parse() {
    let config = DashParserConfig::builder()
        .custom_tag("Fail", |_, _, _| Err("refused".into()))
        .build();
    let options = ParseOptions::new(BASE);

    let err = FullManifestParser::new(config.clone())
        .parse("<MPD><Fail/></MPD>", &options)
        .unwrap_err();
    assert!(matches!(err, Error::CustomTag { .. }));
    assert_eq!(err.tag(), "Fail");

    let mut parser = ProgressiveManifestParser::new(config);
    parser.push("<MPD>", &options).unwrap();
    assert!(parser.is_active());
    assert!(parser.push("<Fail/>", &options).is_err());
    assert!(!parser.is_active());
}

#[test]
fn test_debug_callback_sees_every_event() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let config = DashParserConfig::builder()
        .debug_callback(move |event| {
            let label = match event {
                DebugEvent::Tag { key, .. } => format!("open {key}"),
                DebugEvent::Close { key } => format!("close {key}"),
                DebugEvent::Content(content) => format!("text {content}"),
            };
            sink.lock().unwrap().push(label);
        })
        .build();
    FullManifestParser::new(config)
        .parse(
            "<MPD><Location>next.mpd</Location></MPD>",
            &ParseOptions::new(BASE),
        )
        .unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "open MPD",
            "open Location",
            "text next.mpd",
            "close Location",
            "close MPD",
        ]
    );
}

#[test]
fn test_mismatched_closing_tags() {
    let (parser, seen) = collecting();
    let manifest = parser
        .parse(
            r#"<MPD><Period id="a"></Bogus></MPD>"#,
            &ParseOptions::new(BASE),
        )
        .unwrap();

    assert_eq!(manifest.periods.len(), 1);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|d| d.kind() == DiagnosticKind::Advisory));
    assert!(matches!(&seen[1], Diagnostic::Advisory { tag, .. } if tag == "Period"));
}

#[test]
fn test_unterminated_elements_closed_at_end() {
    let manifest = parse(r#"<MPD><Period id="tail"><AdaptationSet id="a">"#, BASE).unwrap();
    assert_eq!(manifest.periods.len(), 1);
    assert_eq!(manifest.periods[0].adaptation_sets.len(), 1);
}

#[test]
fn test_periods_visible_once_closed() {
    let options = ParseOptions::new(BASE);
    let mut parser = ProgressiveManifestParser::default();
    parser.push(r#"<MPD><Period id="a"><AdaptationSet>"#, &options).unwrap();
    let session = parser.session().unwrap();
    assert!(session.manifest().periods.is_empty());
    assert!(session.state().current_period.is_some());

    parser.push("</AdaptationSet></Period>", &options).unwrap();
    assert_eq!(parser.session().unwrap().manifest().periods.len(), 1);

    let manifest = parser.done(&options).unwrap();
    assert_eq!(manifest.periods.len(), 1);
    assert!(!parser.is_active());
}

#[test]
fn test_state_does_not_leak_between_sessions() {
    let parser = FullManifestParser::default();
    let options = ParseOptions::new(BASE);
    let first = parser
        .parse(
            r#"<MPD><BaseURL>https://other.example/</BaseURL><Period id="a">"#,
            &options,
        )
        .unwrap();
    assert_eq!(first.periods[0].base_url, "https://other.example/");

    let second = parser.parse(r#"<MPD><Period id="b"/></MPD>"#, &options).unwrap();
    assert_eq!(second.periods.len(), 1);
    assert_eq!(second.periods[0].base_url, BASE);
    assert!(second.base_urls.is_empty());
}

#[test]
fn test_timeline_repeat_stops_at_period_end() {
    let input = r#"<MPD type="static" mediaPresentationDuration="PT10S"><Period><AdaptationSet>
        <SegmentTemplate timescale="1" media="$Number$.m4s"><SegmentTimeline>
          <S t="0" d="1" r="1999999"/>
        </SegmentTimeline></SegmentTemplate>
        <Representation id="r" bandwidth="1"/>
    </AdaptationSet></Period></MPD>"#;
    let (parser, seen) = collecting();
    let manifest = parser.parse(input, &ParseOptions::new(BASE)).unwrap();

    let segments = &manifest.representations().next().unwrap().segments;
    assert_eq!(segments.len(), 10);
    assert_eq!(segments[9].uri, "10.m4s");
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_timeline_time_overflow_keeps_parsing() {
    let input = r#"<MPD type="dynamic"><Period><AdaptationSet>
        <SegmentTemplate media="$Time$.m4s"><SegmentTimeline>
          <S t="18446744073709551610" d="10"/>
          <S d="10"/>
        </SegmentTimeline></SegmentTemplate>
        <Representation id="r" bandwidth="1"/>
    </AdaptationSet></Period></MPD>"#;
    let (parser, seen) = collecting();
    let manifest = parser.parse(input, &ParseOptions::new(BASE)).unwrap();

    let segments = &manifest.representations().next().unwrap().segments;
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].uri, "18446744073709551610.m4s");
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind(), DiagnosticKind::Advisory);
}

#[test]
fn test_oversized_template_width_left_verbatim() {
    let manifest = parse(
        r#"<MPD mediaPresentationDuration="PT4S"><Period><AdaptationSet>
            <SegmentTemplate duration="2" media="$Number%0999999999d$.m4s"/>
            <Representation id="r" bandwidth="1"/>
        </AdaptationSet></Period></MPD>"#,
        BASE,
    )
    .unwrap();
    let uris: Vec<&str> = manifest
        .representations()
        .flat_map(|r| &r.segments)
        .map(|s| s.uri.as_str())
        .collect();
    assert_eq!(uris, vec!["$Number%0999999999d$.m4s"; 2]);
}
