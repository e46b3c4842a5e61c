use std::path::PathBuf;

use clap::Parser;
use db::Catalog;
use sqlx::SqlitePool;
use tracing::{error, info, warn};
use warp::{Filter, Rejection, Reply, reject};
mod db;
mod logger;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// SQLite url holding a `topics` table.
    #[clap(short, long)]
    db: Option<String>,
    /// JSON file holding the topic list.
    #[clap(short, long, conflicts_with = "db")]
    file: Option<PathBuf>,
    #[clap(short, long, default_value_t = 3030)]
    port: u16,
    #[clap(long, default_value = "info")]
    log: String,
}


#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger::init(&args.log);

    let catalog = match (args.db, args.file) {
        (Some(db), _) => match SqlitePool::connect(&db).await {
            Ok(pool) => Catalog::Db(pool),
            Err(err) => {
                error!("cannot open {}: {}", db, err);
                return;
            }
        },
        (None, Some(file)) => Catalog::File(file),
        (None, None) => {
            error!("either --db or --file is required");
            return;
        }
    };

    match catalog.topics().await {
        Ok(topics) => info!("serving {} topics", topics.len()),
        Err(err) => warn!("catalog not readable yet: {}", err),
    }

    warp::serve(topics_service(catalog))
        .run(([0, 0, 0, 0], args.port))
        .await;
}

fn topics_service(catalog: Catalog) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let cors = warp::cors().allow_any_origin().allow_methods(vec!["GET"]);
    warp::path!("topics.json")
    .and(warp::get())
    .and(warp::any().map(move || catalog.clone()))
    .and_then(topics_query)
    .with(cors)
}


async fn topics_query(catalog: Catalog) -> Result<impl Reply, Rejection> {
    let topics = catalog.topics().await.map_err(|err| {warn!("{}", err); reject()})?;
    Ok(warp::reply::with_header(
        warp::reply::json(&topics),
        "cache-control",
        "no-store",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol::Topic;
    use std::io::Write;

    #[tokio::test]
    async fn serves_the_catalog_uncached() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"topic":" Beach ","hints":["Sand","Waves"]},{"bogus":1}]"#).unwrap();
        let service = topics_service(Catalog::File(file.path().to_path_buf()));

        let resp = warp::test::request().method("GET").path("/topics.json").reply(&service).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["cache-control"], "no-store");
        let topics: Vec<Topic> = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(topics, vec![Topic::new("Beach", &["Sand", "Waves"])]);
    }

    #[tokio::test]
    async fn broken_catalog_is_not_served() {
        let service = topics_service(Catalog::File(PathBuf::from("/definitely/not/here.json")));
        let resp = warp::test::request().method("GET").path("/topics.json").reply(&service).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[]").unwrap();
        let service = topics_service(Catalog::File(file.path().to_path_buf()));
        let resp = warp::test::request().method("GET").path("/rand-word/0").reply(&service).await;
        assert_eq!(resp.status(), 404);
    }

    #[test]
    fn db_and_file_are_exclusive() {
        assert!(Args::try_parse_from(["lexicon", "--db", "sqlite://x.db", "--file", "t.json"]).is_err());
        let args = Args::try_parse_from(["lexicon", "--file", "t.json"]).unwrap();
        assert_eq!(args.file, Some(PathBuf::from("t.json")));
        assert_eq!(args.port, 3030);
    }
}
