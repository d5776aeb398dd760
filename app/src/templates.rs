use crate::models::{pick_trailer, MovieDetail, MovieSummary, ReleaseStatus, Video};
use crate::search::{DEBOUNCE, MIN_QUERY_CHARS};
use crate::widgets::{Carousel, Disclosure, Modal, DRAG_THRESHOLD_PX};

const SITE_NAME: &str = "Movie Studio";
const HERO_SLIDES: usize = 5;
const ROW_VISIBLE: usize = 6;

pub struct HomeSections<'a> {
    pub now_playing: &'a [MovieSummary],
    pub upcoming: &'a [MovieSummary],
    pub top_rated: &'a [MovieSummary],
    pub popular: &'a [MovieSummary],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieTab {
    #[default]
    Popular,
    TopRated,
    NowPlaying,
}

impl MovieTab {
    pub const ALL: [MovieTab; 3] = [MovieTab::Popular, MovieTab::TopRated, MovieTab::NowPlaying];

    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("top-rated") => MovieTab::TopRated,
            Some("now-playing") => MovieTab::NowPlaying,
            _ => MovieTab::Popular,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            MovieTab::Popular => "popular",
            MovieTab::TopRated => "top-rated",
            MovieTab::NowPlaying => "now-playing",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MovieTab::Popular => "Popular",
            MovieTab::TopRated => "Top Rated",
            MovieTab::NowPlaying => "Now Playing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    About,
    Privacy,
    Terms,
    Contact,
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_home(sections: &HomeSections<'_>, slide: usize, featured: Disclosure) -> String {
    let mut html = String::new();

    html.push_str(&base_start(SITE_NAME));
    html.push_str(r#"<div class="home-page">"#);

    html.push_str(&hero_carousel(sections.now_playing, slide));
    html.push_str(&featured_showcase(sections.top_rated, featured));
    html.push_str(&genre_spotlight(
        "Action & Adventure",
        "Explosive action and thrilling adventures await",
        sections.now_playing,
        28,
    ));
    html.push_str(&movie_row("Now Playing", sections.now_playing));
    html.push_str(&movie_row("Coming Soon", sections.upcoming));
    html.push_str(&genre_spotlight(
        "Critically Acclaimed",
        "Award-winning films and cinematic masterpieces",
        sections.top_rated,
        18,
    ));
    html.push_str(&movie_row("Top Rated", sections.top_rated));
    html.push_str(&movie_row("Popular Right Now", sections.popular));

    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

fn hero_carousel(movies: &[MovieSummary], slide: usize) -> String {
    let slides: Vec<_> = movies.iter().take(HERO_SLIDES).collect();
    let Some(current) = slides.get(slide % slides.len().max(1)) else {
        return String::new();
    };
    let index = slide % slides.len();
    let prev = (index + slides.len() - 1) % slides.len();
    let next = (index + 1) % slides.len();

    let mut html = format!(
        r#"<section class="hero" style="background-image: linear-gradient(rgba(0,0,0,0.3), rgba(0,0,0,0.95)), url('{}');"><div class="hero-content"><h1>{}</h1><p class="overview">{}</p><div class="actions"><a href="/movie/{}?trailer=open" class="play-button">▶ Watch Trailer</a><a href="/movie/{}" class="info-button">More Info</a></div></div><div class="hero-nav"><a href="/?slide={}" class="hero-prev">‹</a>"#,
        escape(&current.backdrop_url()),
        escape(current.display_title()),
        escape(current.display_overview()),
        current.id,
        current.id,
        prev
    );
    for (i, _) in slides.iter().enumerate() {
        let class = if i == index { "dot active" } else { "dot" };
        html.push_str(&format!(r#"<a href="/?slide={}" class="{}"></a>"#, i, class));
    }
    html.push_str(&format!(
        r#"<a href="/?slide={}" class="hero-next">›</a></div></section>"#,
        next
    ));
    html
}

fn featured_showcase(movies: &[MovieSummary], featured: Disclosure) -> String {
    if movies.is_empty() {
        return String::new();
    }

    let mut html = String::from(
        r#"<section class="content-section featured"><div class="section-header"><h2>Featured This Week</h2><a href="/popular" class="view-all">View All ›</a></div><div class="featured-grid">"#,
    );
    for movie in movies.iter().take(6) {
        let expanded = featured.is_expanded(movie.id);
        let toggle = match featured.toggle(movie.id) {
            Disclosure::Expanded(id) => format!("/?expanded={}", id),
            Disclosure::Collapsed => "/".to_string(),
        };
        let class = if expanded {
            "featured-card expanded"
        } else {
            "featured-card"
        };
        html.push_str(&format!(
            r#"<div class="{}"><a href="{}"><img src="{}" alt="{}" onerror="this.src='/static/placeholder.svg'"><h3>{}</h3></a>"#,
            class,
            toggle,
            escape(&movie.backdrop_url()),
            escape(movie.display_title()),
            escape(movie.display_title())
        ));
        if expanded {
            html.push_str(&format!(
                r#"<div class="featured-details"><p class="overview">{}</p>{}<a href="/movie/{}" class="play-button">Details</a></div>"#,
                escape(movie.display_overview()),
                rating_html(movie),
                movie.id
            ));
        }
        html.push_str("</div>");
    }
    html.push_str("</div></section>");
    html
}

fn genre_spotlight(title: &str, description: &str, movies: &[MovieSummary], genre_id: i64) -> String {
    let matching: Vec<&MovieSummary> = movies.iter().filter(|m| m.has_genre(genre_id)).collect();
    let picks: Vec<&MovieSummary> = if matching.is_empty() {
        movies.iter().take(4).collect()
    } else {
        matching.into_iter().take(4).collect()
    };
    let Some((main, side)) = picks.split_first() else {
        return String::new();
    };

    let mut html = format!(
        r#"<section class="content-section spotlight"><div class="section-header"><div><h2>{}</h2><p>{}</p></div><a href="/genre/{}" class="view-all">Explore ›</a></div><div class="spotlight-grid"><a class="spotlight-main" href="/movie/{}"><img src="{}" alt="{}" onerror="this.src='/static/placeholder.svg'"><h3>{}</h3></a>"#,
        escape(title),
        escape(description),
        genre_id,
        main.id,
        escape(&main.backdrop_url()),
        escape(main.display_title()),
        escape(main.display_title())
    );
    for movie in side {
        html.push_str(&format!(
            r#"<a class="spotlight-side" href="/movie/{}"><img src="{}" alt="{}" onerror="this.src='/static/placeholder.svg'"><h4>{}</h4></a>"#,
            movie.id,
            escape(&movie.backdrop_url()),
            escape(movie.display_title()),
            escape(movie.display_title())
        ));
    }
    html.push_str("</div></section>");
    html
}

fn movie_row(title: &str, movies: &[MovieSummary]) -> String {
    if movies.is_empty() {
        return String::new();
    }

    let carousel = Carousel::new(movies.len(), ROW_VISIBLE);
    let mut html = format!(
        r#"<section class="content-section"><h2>{}</h2><div class="carousel" data-max-index="{}" data-drag-threshold="{}"><button class="carousel-arrow prev" type="button" aria-label="Previous" disabled>&#8249;</button><div class="carousel-track">"#,
        escape(title),
        carousel.max_index(),
        DRAG_THRESHOLD_PX
    );
    for movie in movies {
        html.push_str(&movie_card(movie));
    }
    html.push_str(&format!(
        r#"</div><button class="carousel-arrow next" type="button" aria-label="Next"{}>&#8250;</button></div></section>"#,
        if carousel.max_index() == 0 { " disabled" } else { "" }
    ));
    html
}

fn rating_html(movie: &MovieSummary) -> String {
    movie
        .rating_badge()
        .map(|r| format!(r#"<p class="rating">⭐ {}</p>"#, r))
        .unwrap_or_default()
}

fn movie_card(movie: &MovieSummary) -> String {
    let year = movie
        .release_year()
        .map(|y| format!(r#"<span class="year">{}</span>"#, y))
        .unwrap_or_default();
    format!(
        r#"<div class="content-card" data-key="{}"><a href="/movie/{}"><img src="{}" alt="{}" onerror="this.src='/static/placeholder.svg'"><div class="card-info"><h3>{}</h3>{}<p class="overview">{}</p>{}</div></a></div>"#,
        escape(&movie.render_key()),
        movie.id,
        escape(&movie.poster_url()),
        escape(movie.display_title()),
        escape(movie.display_title()),
        rating_html(movie),
        escape(movie.display_overview()),
        year
    )
}

fn movie_grid(movies: &[MovieSummary], empty_message: &str) -> String {
    if movies.is_empty() {
        return format!(r#"<div class="no-results">{}</div>"#, escape(empty_message));
    }

    let mut html = String::from(r#"<div class="content-grid" id="movie-grid">"#);
    for movie in movies {
        html.push_str(&movie_card(movie));
    }
    html.push_str("</div>");
    html
}

fn banner(heading: &str, badge: &str, featured: Option<&MovieSummary>, blurb: &str) -> String {
    let background = featured
        .filter(|m| m.backdrop_path.is_some())
        .map(|m| {
            format!(
                r#" style="background-image: linear-gradient(rgba(0,0,0,0.4), rgba(0,0,0,0.95)), url('{}');""#,
                escape(&m.backdrop_url())
            )
        })
        .unwrap_or_default();
    let featured_line = featured
        .map(|m| {
            format!(
                r#"<p class="featured-line">Featured: <strong>{}</strong> {}</p>"#,
                escape(m.display_title()),
                m.rating_badge()
                    .map(|r| format!("⭐ {}", r))
                    .unwrap_or_default()
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="banner"{}><div class="banner-content"><span class="badge">{}</span><h1>{}</h1><p>{}</p>{}</div></div>"#,
        background,
        escape(badge),
        escape(heading),
        escape(blurb),
        featured_line
    )
}

pub fn render_movies(
    tab: MovieTab,
    popular: &[MovieSummary],
    top_rated: &[MovieSummary],
    now_playing: &[MovieSummary],
) -> String {
    let mut html = String::new();

    html.push_str(&base_start(&format!("All Movies - {}", SITE_NAME)));
    html.push_str(
        r#"<div class="movies-page"><div class="page-header"><h1>All Movies</h1><p>Discover thousands of movies across different categories</p></div><nav class="tabs">"#,
    );
    for candidate in MovieTab::ALL {
        let class = if candidate == tab { "tab active" } else { "tab" };
        html.push_str(&format!(
            r#"<a href="/movie?tab={}" class="{}">{}</a>"#,
            candidate.slug(),
            class,
            candidate.label()
        ));
    }
    html.push_str("</nav>");

    let movies = match tab {
        MovieTab::Popular => popular,
        MovieTab::TopRated => top_rated,
        MovieTab::NowPlaying => now_playing,
    };
    html.push_str(&movie_grid(movies, "No movies available right now."));

    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

pub fn render_movie_detail(
    movie: &MovieDetail,
    videos: &[Video],
    you_may_like: &[MovieSummary],
    trailer_modal: Modal,
) -> String {
    let mut html = String::new();

    html.push_str(&base_start(&format!("{} - {}", movie.heading(), SITE_NAME)));

    let mut meta = String::new();
    if let Some(rating) = movie.rating_badge() {
        meta.push_str(&format!(
            r#"<span class="rating">⭐ {} ({} votes)</span>"#,
            rating, movie.vote_count
        ));
    }
    if movie.status != ReleaseStatus::Unknown {
        meta.push_str(&format!(
            r#"<span class="status">{}</span>"#,
            movie.status.label()
        ));
    }
    if let Some(year) = movie.release_year() {
        meta.push_str(&format!(r#"<span class="year">{}</span>"#, year));
    }
    if let Some(runtime) = movie.runtime_label() {
        meta.push_str(&format!(r#"<span class="runtime">{}</span>"#, runtime));
    }
    if let Some(lang) = movie.original_language.as_deref().filter(|l| !l.is_empty()) {
        meta.push_str(&format!(
            r#"<span class="language">{}</span>"#,
            escape(&lang.to_uppercase())
        ));
    }

    let genres: String = movie
        .genres
        .iter()
        .map(|g| {
            format!(
                r#"<a class="genre-tag" href="/genre/{}?genre={}">{}</a>"#,
                g.id,
                escape(&g.name),
                escape(&g.name)
            )
        })
        .collect();

    let tagline = movie
        .tagline
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(|t| format!(r#"<p class="tagline">&ldquo;{}&rdquo;</p>"#, escape(t)))
        .unwrap_or_default();

    let trailer = pick_trailer(videos);
    let trailer_button = trailer
        .map(|_| {
            format!(
                r#"<div class="actions"><a href="/movie/{}?trailer=open" class="play-button">▶ Watch Trailer</a></div>"#,
                movie.id
            )
        })
        .unwrap_or_default();

    html.push_str(&format!(
        r#"<div class="detail-page"><div class="detail-hero" style="background-image: linear-gradient(rgba(0,0,0,0.7), rgba(0,0,0,0.9)), url('{}');"><div class="detail-content"><img class="detail-poster" src="{}" alt="{}" onerror="this.src='/static/placeholder.svg'"><div class="detail-info"><h1>{}</h1>{}<div class="meta">{}</div><div class="genres">{}</div>{}</div></div></div>"#,
        escape(&movie.backdrop_url()),
        escape(&movie.poster_url()),
        escape(movie.heading()),
        escape(movie.heading()),
        tagline,
        meta,
        genres,
        trailer_button
    ));

    if let (true, Some(video)) = (trailer_modal.is_open(), trailer) {
        if let Some(embed) = video.embed_url() {
            html.push_str(&format!(
                r#"<div class="modal open"><div class="modal-body"><a href="/movie/{}" class="modal-close">✕</a><iframe class="video-player" src="{}" title="{} - Trailer" frameborder="0" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe></div></div>"#,
                movie.id,
                escape(&embed),
                escape(movie.heading())
            ));
        }
    }

    html.push_str(&format!(
        r#"<section class="overview-section"><h2>Overview</h2><p class="overview">{}</p></section>"#,
        escape(movie.display_overview())
    ));

    let mut stats = String::new();
    if let Some(budget) = movie.budget_label() {
        stats.push_str(&format!(
            r#"<div class="stat-card"><h3>Budget</h3><p>{}</p></div>"#,
            budget
        ));
    }
    if let Some(revenue) = movie.revenue_label() {
        stats.push_str(&format!(
            r#"<div class="stat-card"><h3>Revenue</h3><p>{}</p></div>"#,
            revenue
        ));
    }
    if movie.popularity > 0.0 {
        stats.push_str(&format!(
            r#"<div class="stat-card"><h3>Popularity</h3><p>{:.0}</p></div>"#,
            movie.popularity
        ));
    }
    if !stats.is_empty() {
        html.push_str(&format!(r#"<section class="stats-grid">{}</section>"#, stats));
    }

    if !movie.production_companies.is_empty() {
        let count = movie.production_companies.len();
        html.push_str(&format!(
            r#"<section class="companies-section"><h2>Production Companies <span class="count">{} {}</span></h2><div class="company-grid">"#,
            count,
            if count == 1 { "company" } else { "companies" }
        ));
        for company in &movie.production_companies {
            let logo = company
                .logo_url()
                .map(|url| {
                    format!(
                        r#"<img src="{}" alt="{}">"#,
                        escape(&url),
                        escape(&company.name)
                    )
                })
                .unwrap_or_else(|| r#"<div class="logo-placeholder">🎬</div>"#.to_string());
            html.push_str(&format!(
                r#"<div class="company-card">{}<p>{}</p></div>"#,
                logo,
                escape(&company.name)
            ));
        }
        html.push_str("</div></section>");
    }

    if !movie.spoken_languages.is_empty() {
        let languages: Vec<String> = movie
            .spoken_languages
            .iter()
            .map(|l| {
                if l.english_name.is_empty() {
                    escape(&l.name)
                } else {
                    escape(&l.english_name)
                }
            })
            .collect();
        html.push_str(&format!(
            r#"<section class="languages-section"><h2>Spoken Languages</h2><p>{}</p></section>"#,
            languages.join(", ")
        ));
    }

    let mut playable: Vec<&Video> = videos.iter().filter(|v| v.embed_url().is_some()).collect();
    playable.sort_by_key(|v| std::cmp::Reverse(v.published()));
    if !playable.is_empty() {
        html.push_str(r#"<section class="videos-section"><h2>Official Videos</h2><div class="video-grid">"#);
        for video in playable.iter().take(6) {
            let official = if video.official { " • Official" } else { "" };
            html.push_str(&format!(
                r#"<div class="video-card"><p class="video-kind">{}{}</p><a href="{}" target="_blank" rel="noopener"><img src="{}" alt="{}" onerror="this.src='/static/placeholder.svg'"></a><p>{}</p></div>"#,
                video.kind.label(),
                official,
                escape(&video.embed_url().unwrap_or_default()),
                escape(&video.thumbnail_url()),
                escape(&video.name),
                escape(&video.name)
            ));
        }
        html.push_str("</div></section>");
    }

    let others: Vec<MovieSummary> = you_may_like
        .iter()
        .filter(|m| m.id != movie.id)
        .take(8)
        .cloned()
        .collect();
    if !others.is_empty() {
        html.push_str(r#"<section class="similar-section"><h2>You May Also Like</h2>"#);
        html.push_str(&movie_grid(&others, ""));
        html.push_str("</section>");
    }

    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

pub fn render_movie_unavailable(id: &str) -> String {
    let mut html = String::new();
    html.push_str(&base_start(&format!("Movie unavailable - {}", SITE_NAME)));
    html.push_str(&format!(
        r#"<div class="no-results"><h1>Movie unavailable</h1><p>We couldn't load details for movie #{}. It may have been removed, or the movie database is unreachable right now.</p><a href="/" class="play-button">Back to Home</a></div>"#,
        escape(id)
    ));
    html.push_str(&base_end());
    html
}

pub fn render_genre(genre_id: i64, genre_name: &str, movies: &[MovieSummary]) -> String {
    let mut html = String::new();

    html.push_str(&base_start(&format!("{} Movies - {}", genre_name, SITE_NAME)));
    html.push_str(&format!(r#"<div class="genre-page" data-genre-id="{}">"#, genre_id));
    html.push_str(&banner(
        &format!("{} Movies", genre_name),
        &format!("{} Genre · {} Movies", genre_name, movies.len()),
        movies.first(),
        &format!(
            "Explore our curated collection of {} {} movies. From classics to modern masterpieces, discover your next favorite film.",
            movies.len(),
            genre_name.to_lowercase()
        ),
    ));
    html.push_str(&movie_grid(movies, "No movies found in this genre."));
    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

pub fn render_popular(movies: &[MovieSummary]) -> String {
    let mut html = String::new();

    html.push_str(&base_start(&format!("Popular Movies - {}", SITE_NAME)));
    html.push_str(r#"<div class="popular-page">"#);
    html.push_str(&banner(
        "Popular Movies",
        &format!("Popular · {} Movies", movies.len()),
        movies.first(),
        "Explore the most popular movies loved by audiences worldwide. From box office hits to fan favorites.",
    ));

    if movies.is_empty() {
        html.push_str(&movie_grid(movies, "No movies available right now."));
    } else {
        html.push_str(&movie_grid(movies, ""));
        html.push_str(
            r#"<div id="sentinel" class="sentinel" data-endpoint="/api/movies/popular" data-next-page="2"><p class="loading-text" hidden>Loading more movies...</p></div>"#,
        );
        html.push_str(INFINITE_SCROLL_SCRIPT);
    }

    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

/// `results` is `None` when no search has been made yet.
pub fn render_search(
    query: &str,
    results: Option<&[MovieSummary]>,
    popular: &[MovieSummary],
) -> String {
    let mut html = String::new();

    html.push_str(&base_start(&format!("Search - {}", SITE_NAME)));
    html.push_str(&format!(
        r#"<div class="search-page" data-debounce-ms="{}" data-min-chars="{}"><h1>Search Movies</h1><p>Discover your favorite movies, explore new releases, and find hidden gems</p><form class="search-box" action="/search" method="get"><input type="text" id="search-input" name="q" placeholder="Enter movie name, actor, genre..." value="{}" autocomplete="off" autofocus><button type="submit">Search</button></form><p id="search-hint" class="hint" hidden>Type at least {} characters to search...</p>"#,
        DEBOUNCE.as_millis(),
        MIN_QUERY_CHARS,
        escape(query),
        MIN_QUERY_CHARS
    ));

    let suggestions_hidden = if results.is_some() { " hidden" } else { "" };
    html.push_str(&format!(
        r#"<section id="suggestions" class="search-suggestions"{}><h2>Popular Searches</h2><div class="suggestion-tags">"#,
        suggestions_hidden
    ));
    for genre in [
        "Action", "Comedy", "Drama", "Thriller", "Sci-Fi", "Horror", "Romance", "Adventure",
    ] {
        html.push_str(&format!(
            r#"<a href="/search?q={}" class="suggestion-tag" data-term="{}">{}</a>"#,
            genre, genre, genre
        ));
    }
    html.push_str("</div></section>");

    html.push_str(r#"<section id="search-results">"#);
    if let Some(results) = results {
        html.push_str(&format!(
            r#"<h2>Search Results for "{}"</h2>"#,
            escape(query.trim())
        ));
        html.push_str(&movie_grid(
            results,
            &format!(
                "No movies found for \"{}\". Try a different search term.",
                query.trim()
            ),
        ));
    }
    html.push_str("</section>");

    if !popular.is_empty() {
        html.push_str(&format!(
            r#"<section id="also-like" class="similar-section"{}><h2>You May Also Like</h2>"#,
            if results.is_some() { "" } else { " hidden" }
        ));
        html.push_str(&movie_grid(&popular[..popular.len().min(8)], ""));
        html.push_str("</section>");
    }

    html.push_str("</div>");
    html.push_str(SEARCH_SCRIPT);
    html.push_str(&base_end());
    html
}

pub fn render_static(page: StaticPage) -> String {
    let (title, body) = match page {
        StaticPage::About => (
            "About Us",
            r#"<p>Movie Studio is a place to discover films: browse what is popular, what is playing now and what is coming soon, and watch trailers before you pick tonight's movie.</p><h2>What we offer</h2><ul><li>Curated rows of popular, top rated and upcoming movies</li><li>Genre collections for every mood</li><li>Trailers and official videos for each title</li></ul><p>Movie metadata and images are provided by TMDB. This product uses the TMDB API but is not endorsed or certified by TMDB.</p>"#,
        ),
        StaticPage::Privacy => (
            "Privacy Policy",
            r#"<p>We do not ask you to create an account and we do not store personal information. Pages are rendered from public movie metadata.</p><h2>Third parties</h2><p>Trailers are embedded from their hosting platforms, which may set their own cookies when you play a video. Movie data is fetched from TMDB on your behalf; your searches are forwarded without any identifying information.</p><h2>Logs</h2><p>Our servers keep short-lived request logs for operating the service.</p>"#,
        ),
        StaticPage::Terms => (
            "Terms of Service",
            r#"<p>Movie Studio is provided as-is for personal, non-commercial browsing of movie information.</p><h2>Content</h2><p>All titles, images and trailers belong to their respective owners. We do not host or stream full-length films.</p><h2>Availability</h2><p>Movie data comes from a third-party service and may occasionally be incomplete or unavailable.</p>"#,
        ),
        StaticPage::Contact => (
            "Contact",
            r#"<p>Questions, feedback or a broken page? We would love to hear from you.</p><ul><li>Email: <a href="mailto:hello@moviestudio.example">hello@moviestudio.example</a></li><li>Issues with movie data should be reported to TMDB directly.</li></ul>"#,
        ),
    };

    let mut html = String::new();
    html.push_str(&base_start(&format!("{} - {}", title, SITE_NAME)));
    html.push_str(&format!(
        r#"<div class="static-page"><h1>{}</h1>{}</div>"#,
        title, body
    ));
    html.push_str(&base_end());
    html
}

fn base_start(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <link rel="stylesheet" href="/static/style.css">
    <script>{}</script>
</head>
<body>
    <nav class="navbar" id="site-header">
        <div class="nav-brand">
            <a href="/">{}</a>
        </div>
        <div class="nav-links">
            <a href="/">Home</a>
            <a href="/movie">Movies</a>
            <a href="/popular">Popular</a>
            <details class="genre-menu" id="genre-menu">
                <summary>Browse Genres</summary>
                <div class="genre-list"><span class="muted">Loading genres...</span></div>
            </details>
            <a href="/search" class="search-link">Search movies...</a>
        </div>
    </nav>
    <main>"#,
        escape(title),
        CARD_SCRIPT,
        SITE_NAME
    )
}

fn base_end() -> String {
    format!(
        r#"</main>
    <footer class="footer">
        <div class="footer-links">
            <a href="/about">About</a>
            <a href="/privacy">Privacy</a>
            <a href="/terms">Terms</a>
            <a href="/contact">Contact</a>
        </div>
        <p>Data provided by TMDB.</p>
    </footer>
    {}
    {}
</body></html>"#,
        SHELL_SCRIPT, CAROUSEL_SCRIPT
    )
}

// Arrow and drag paging for movie rows. Each row keeps its own index and
// never pages past `data-max-index`; a drag pages only once it passes
// `data-drag-threshold` pixels.
const CAROUSEL_SCRIPT: &str = r#"<script>
(function() {
    document.querySelectorAll(".carousel[data-max-index]").forEach(function(row) {
        var track = row.querySelector(".carousel-track");
        var prev = row.querySelector(".carousel-arrow.prev");
        var next = row.querySelector(".carousel-arrow.next");
        var maxIndex = parseInt(row.dataset.maxIndex, 10) || 0;
        var threshold = parseInt(row.dataset.dragThreshold, 10) || 100;
        var index = 0;
        var dragStart = null;

        function render() {
            var card = track.firstElementChild;
            var gap = parseFloat(getComputedStyle(track).columnGap) || 0;
            var step = card ? card.getBoundingClientRect().width + gap : 0;
            track.style.transform = "translateX(" + (-index * step) + "px)";
            prev.disabled = index <= 0;
            next.disabled = index >= maxIndex;
        }

        function slide(delta) {
            index = Math.max(0, Math.min(maxIndex, index + delta));
            render();
        }

        prev.addEventListener("click", function() { slide(-1); });
        next.addEventListener("click", function() { slide(1); });
        track.addEventListener("pointerdown", function(e) { dragStart = e.clientX; });
        window.addEventListener("pointerup", function(e) {
            if (dragStart === null) return;
            var offset = e.clientX - dragStart;
            dragStart = null;
            if (offset < -threshold) {
                slide(1);
            } else if (offset > threshold) {
                slide(-1);
            }
        });
        window.addEventListener("resize", render);
    });
})();
</script>"#;

// Header hide-on-scroll and the genre menu. Scroll state lives inside the
// closure of the header it controls.
const SHELL_SCRIPT: &str = r#"<script>
(function() {
    var header = document.getElementById("site-header");
    var lastY = 0;
    window.addEventListener("scroll", function() {
        var y = window.scrollY;
        if (y < lastY || y < 50) {
            header.classList.remove("hidden");
        } else if (y > lastY && y > 100) {
            header.classList.add("hidden");
        }
        lastY = y;
    }, { passive: true });

    var menu = document.getElementById("genre-menu");
    var loaded = false;
    menu.addEventListener("toggle", function() {
        if (!menu.open || loaded) return;
        loaded = true;
        var list = menu.querySelector(".genre-list");
        fetch("/api/genres")
            .then(function(r) { return r.json(); })
            .then(function(data) {
                list.textContent = "";
                (data.genres || []).forEach(function(g) {
                    var a = document.createElement("a");
                    a.href = "/genre/" + g.id + "?genre=" + encodeURIComponent(g.name);
                    a.textContent = g.name;
                    list.appendChild(a);
                });
                if (!list.children.length) list.textContent = "No genres available";
            })
            .catch(function() { list.textContent = "No genres available"; });
    });
})();
</script>"#;

const CARD_SCRIPT: &str = r#"
function movieCard(m) {
    var card = document.createElement("div");
    card.className = "content-card";
    card.dataset.key = m.id + "-" + (m.title || "");
    var link = document.createElement("a");
    link.href = "/movie/" + m.id;
    var img = document.createElement("img");
    var path = m.poster_path || m.backdrop_path;
    img.src = path ? "https://image.tmdb.org/t/p/w500" + path : "/static/placeholder.svg";
    img.alt = m.title || "Untitled";
    img.onerror = function() { this.src = "/static/placeholder.svg"; };
    var info = document.createElement("div");
    info.className = "card-info";
    var h3 = document.createElement("h3");
    h3.textContent = m.title || "Untitled";
    info.appendChild(h3);
    if (m.vote_average > 0) {
        var rating = document.createElement("p");
        rating.className = "rating";
        rating.textContent = "⭐ " + m.vote_average.toFixed(1);
        info.appendChild(rating);
    }
    var overview = document.createElement("p");
    overview.className = "overview";
    overview.textContent = m.overview || "No description available.";
    info.appendChild(overview);
    link.appendChild(img);
    link.appendChild(info);
    card.appendChild(link);
    return card;
}
"#;

const INFINITE_SCROLL_SCRIPT: &str = r#"<script>
(function() {
    var grid = document.getElementById("movie-grid");
    var sentinel = document.getElementById("sentinel");
    var hint = sentinel.querySelector(".loading-text");
    var endpoint = sentinel.dataset.endpoint;
    var page = parseInt(sentinel.dataset.nextPage, 10);
    var loading = false;
    var exhausted = false;

    function finish() {
        observer.disconnect();
        hint.hidden = false;
        hint.textContent = "No more movies to load";
    }

    function loadMore() {
        if (loading || exhausted) return;
        loading = true;
        hint.hidden = false;
        fetch(endpoint + "?page=" + page)
            .then(function(r) { return r.ok ? r.json() : []; })
            .then(function(items) {
                if (!Array.isArray(items) || items.length === 0) {
                    exhausted = true;
                    return;
                }
                items.forEach(function(m) { grid.appendChild(movieCard(m)); });
                page += 1;
            })
            .catch(function() { exhausted = true; })
            .then(function() {
                loading = false;
                hint.hidden = true;
                if (exhausted) finish();
            });
    }

    var observer = new IntersectionObserver(function(entries) {
        if (entries[0].isIntersecting) loadMore();
    }, { threshold: 0.1 });
    observer.observe(sentinel);
})();
</script>"#;

const SEARCH_SCRIPT: &str = r#"<script>
(function() {
    var root = document.querySelector(".search-page");
    var input = document.getElementById("search-input");
    var hint = document.getElementById("search-hint");
    var suggestions = document.getElementById("suggestions");
    var results = document.getElementById("search-results");
    var alsoLike = document.getElementById("also-like");
    var delay = parseInt(root.dataset.debounceMs, 10);
    var minChars = parseInt(root.dataset.minChars, 10);
    var timer = null;
    var latest = 0;

    function show(searched) {
        suggestions.hidden = searched;
        if (alsoLike) alsoLike.hidden = !searched;
    }

    function heading(q) {
        var h2 = document.createElement("h2");
        h2.textContent = 'Search Results for "' + q + '"';
        return h2;
    }

    function render(q, movies) {
        results.textContent = "";
        results.appendChild(heading(q));
        if (movies.length === 0) {
            var empty = document.createElement("div");
            empty.className = "no-results";
            empty.textContent = 'No movies found for "' + q + '". Try a different search term.';
            results.appendChild(empty);
            return;
        }
        var grid = document.createElement("div");
        grid.className = "content-grid";
        movies.forEach(function(m) { grid.appendChild(movieCard(m)); });
        results.appendChild(grid);
    }

    function settle() {
        var q = input.value.trim();
        if (q.length === 0) {
            latest += 1;
            results.textContent = "";
            show(false);
            return;
        }
        if (q.length < minChars) return;

        var seq = ++latest;
        show(true);
        results.textContent = "";
        results.appendChild(heading(q));
        var loading = document.createElement("p");
        loading.className = "loading-text";
        loading.textContent = "Searching...";
        results.appendChild(loading);
        history.replaceState(null, "", "/search?q=" + encodeURIComponent(q));

        fetch("/api/search?query=" + encodeURIComponent(q))
            .then(function(r) { return r.ok ? r.json() : []; })
            .catch(function() { return []; })
            .then(function(movies) {
                if (seq !== latest) return;
                render(q, Array.isArray(movies) ? movies : []);
            });
    }

    input.addEventListener("input", function() {
        var q = input.value.trim();
        hint.hidden = !(q.length > 0 && q.length < minChars);
        clearTimeout(timer);
        timer = setTimeout(settle, delay);
    });

    document.querySelectorAll(".suggestion-tag").forEach(function(tag) {
        tag.addEventListener("click", function(e) {
            e.preventDefault();
            input.value = tag.dataset.term;
            clearTimeout(timer);
            timer = setTimeout(settle, delay);
        });
    });
})();
</script>"#;
