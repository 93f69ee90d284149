//! XML bodies shaped like Last.fm web service responses

/// Escape text for use inside an element or attribute
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Wrap `inner` in a successful `<lfm>` envelope
pub fn ok(inner: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<lfm status=\"ok\">{}</lfm>",
        inner
    )
}

/// An empty successful response, as returned by write methods
pub fn ok_empty() -> String {
    ok("")
}

/// A failed response carrying an error code
pub fn failed(code: i32, message: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<lfm status=\"failed\"><error code=\"{}\">{}</error></lfm>",
        code,
        escape(message)
    )
}

fn tag_elements(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| {
            format!(
                "<tag><name>{}</name><url>https://www.last.fm/tag/{}</url></tag>",
                escape(name),
                escape(name)
            )
        })
        .collect()
}

/// `tag.getSimilar`
pub fn similar_tags(tag: &str, names: &[&str]) -> String {
    ok(&format!(
        "<similartags tag=\"{}\">{}</similartags>",
        escape(tag),
        tag_elements(names)
    ))
}

/// `*.getTags`
pub fn tags(names: &[&str]) -> String {
    ok(&format!("<tags>{}</tags>", tag_elements(names)))
}

/// `*.getTopTags`
pub fn top_tags(names: &[&str]) -> String {
    ok(&format!("<toptags>{}</toptags>", tag_elements(names)))
}

/// `tag.getTopArtists`, each artist with a tag count
pub fn top_artists(tag: &str, artists: &[(&str, u64)]) -> String {
    let items: String = artists
        .iter()
        .enumerate()
        .map(|(i, (name, count))| {
            format!(
                "<artist rank=\"{}\"><name>{}</name><tagcount>{}</tagcount></artist>",
                i + 1,
                escape(name),
                count
            )
        })
        .collect();
    ok(&format!(
        "<topartists tag=\"{}\">{}</topartists>",
        escape(tag),
        items
    ))
}

/// `tag.getTopAlbums`, given `(artist, album)` pairs
pub fn top_albums(tag: &str, albums: &[(&str, &str)]) -> String {
    let items: String = albums
        .iter()
        .enumerate()
        .map(|(i, (artist, title))| {
            format!(
                "<album rank=\"{}\"><name>{}</name><artist><name>{}</name></artist></album>",
                i + 1,
                escape(title),
                escape(artist)
            )
        })
        .collect();
    ok(&format!(
        "<topalbums tag=\"{}\">{}</topalbums>",
        escape(tag),
        items
    ))
}

/// `tag.search`
pub fn tag_search(term: &str, total: u64, names: &[&str]) -> String {
    ok(&format!(
        "<results for=\"{term}\" xmlns:opensearch=\"http://a9.com/-/spec/opensearch/1.1/\">\
         <opensearch:totalResults>{total}</opensearch:totalResults>\
         <opensearch:itemsPerPage>{count}</opensearch:itemsPerPage>\
         <tagmatches>{items}</tagmatches></results>",
        term = escape(term),
        total = total,
        count = names.len(),
        items = tag_elements(names)
    ))
}

/// `track.search`, given `(artist, title)` pairs
pub fn track_search(term: &str, total: u64, tracks: &[(&str, &str)]) -> String {
    let items: String = tracks
        .iter()
        .map(|(artist, title)| {
            format!(
                "<track><name>{}</name><artist>{}</artist></track>",
                escape(title),
                escape(artist)
            )
        })
        .collect();
    ok(&format!(
        "<results for=\"{term}\" xmlns:opensearch=\"http://a9.com/-/spec/opensearch/1.1/\">\
         <opensearch:totalResults>{total}</opensearch:totalResults>\
         <trackmatches>{items}</trackmatches></results>",
        term = escape(term),
        total = total,
        items = items
    ))
}

/// `*.getWeeklyChartList`, given `(from, to)` unix timestamps
pub fn weekly_chart_list(spans: &[(i64, i64)]) -> String {
    let charts: String = spans
        .iter()
        .map(|(from, to)| format!("<chart from=\"{}\" to=\"{}\"/>", from, to))
        .collect();
    ok(&format!("<weeklychartlist>{}</weeklychartlist>", charts))
}

/// `*.getWeeklyArtistChart`, given `(artist, playcount)` pairs in rank order
pub fn weekly_artist_chart(from: i64, to: i64, artists: &[(&str, u64)]) -> String {
    let items: String = artists
        .iter()
        .enumerate()
        .map(|(i, (name, playcount))| {
            format!(
                "<artist rank=\"{}\"><name>{}</name><playcount>{}</playcount></artist>",
                i + 1,
                escape(name),
                playcount
            )
        })
        .collect();
    ok(&format!(
        "<weeklyartistchart from=\"{}\" to=\"{}\">{}</weeklyartistchart>",
        from, to, items
    ))
}

/// `user.getInfo`
pub fn user_info(name: &str, playcount: u64) -> String {
    ok(&format!(
        "<user><name>{}</name>\
         <image size=\"small\">https://lastfm.freetls.fastly.net/i/u/34s/avatar.png</image>\
         <image size=\"large\">https://lastfm.freetls.fastly.net/i/u/174s/avatar.png</image>\
         <country>Germany</country><lang>de</lang><age>31</age><gender>f</gender>\
         <subscriber>0</subscriber><playcount>{}</playcount></user>",
        escape(name),
        playcount
    ))
}

/// `user.getRecommendedEvents`, given `(id, title)` pairs
pub fn recommended_events(events: &[(u64, &str)]) -> String {
    let items: String = events
        .iter()
        .map(|(id, title)| {
            format!(
                "<event><id>{}</id><title>{}</title></event>",
                id,
                escape(title)
            )
        })
        .collect();
    ok(&format!("<events>{}</events>", items))
}

/// `artist.getSimilar`, given `(name, match)` pairs
pub fn similar_artists(artist: &str, similar: &[(&str, f64)]) -> String {
    let items: String = similar
        .iter()
        .map(|(name, score)| {
            format!(
                "<artist><name>{}</name><mbid></mbid><match>{}</match>\
                 <url>https://www.last.fm/music/{}</url></artist>",
                escape(name),
                score,
                escape(name)
            )
        })
        .collect();
    ok(&format!(
        "<similarartists artist=\"{}\">{}</similarartists>",
        escape(artist),
        items
    ))
}

/// `album.getInfo` with a wiki
pub fn album_info(artist: &str, title: &str, summary: &str) -> String {
    ok(&format!(
        "<album><name>{}</name><artist>{}</artist>\
         <wiki><published>27 Jul 2008, 15:44</published>\
         <summary>{}</summary><content>{}</content></wiki></album>",
        escape(title),
        escape(artist),
        escape(summary),
        escape(summary)
    ))
}

/// `auth.getToken`
pub fn token(token: &str) -> String {
    ok(&format!("<token>{}</token>", escape(token)))
}

/// `auth.getMobileSession` / `auth.getSession`
pub fn session(name: &str, key: &str, subscriber: bool) -> String {
    ok(&format!(
        "<session><name>{}</name><key>{}</key><subscriber>{}</subscriber></session>",
        escape(name),
        escape(key),
        u8::from(subscriber)
    ))
}
