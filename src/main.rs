use anyhow::Context;
use clap::Parser;
use mockup_kit::{cli, config, photos, preprocess, snippet, table};
use cli::{Cli, Commands};
use config::Config;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("エラー: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// 戻り値は項目単位のエラーがなかったかどうか
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = Config::load().context("設定ファイルの読み込みに失敗")?;
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Download { table: table_path, out_dir, manifest, force } => {
            println!("📥 mockup-kit - スニペット取得\n");

            let table_path = match table_path {
                Some(path) => path,
                None => table::discover_table(&cwd)?,
            };
            let rows = table::load_rows(&table_path)?;
            println!("✔ {}行を読み込み: {}\n", rows.len(), table_path.display());

            let manifest_path = snippet::absolutize(&manifest);
            let options = snippet::DownloadOptions {
                output_dir: snippet::absolutize(&out_dir),
                manifest_root: manifest_path.parent().map(Path::to_path_buf),
                local_prefix: snippet::local_prefix_for(&config.local_prefix_root, &manifest_path),
                base_url: config.source_html_base.clone(),
                force,
            };

            let source = snippet::HttpSnippetSource::new()?;
            let report = snippet::download_snippets(&source, &rows, &options).await?;
            snippet::write_manifest(&manifest_path, &report.manifest)?;

            println!("✔ manifest: {} ({}件)", manifest_path.display(), report.manifest.len());
            println!(
                "\n保存 {}件 / スキップ {}件 / エラー {}件",
                report.saved,
                report.skipped,
                report.errors.len()
            );
            for error in &report.errors {
                println!("  - {}", error);
            }
            Ok(!report.has_errors())
        }

        Commands::Preprocess { html_dir, manifest, output_dir } => {
            println!("🧩 mockup-kit - 前処理\n");

            let options = preprocess::PreprocessOptions {
                html_dir,
                manifest,
                output_dir,
            };
            let report = preprocess::run_preprocess(&options)?;

            println!("\n✅ 前処理完了: {}", options.output_dir.display());
            Ok(!report.has_failures())
        }

        Commands::Photos { config: config_path, output, attribution, dry_run, force } => {
            println!("📸 mockup-kit - 写真取得\n");

            let entries = photos::load_image_config(&config_path)
                .context("先に `mockup-kit preprocess` で image-config.json を作成してください")?;
            println!("✔ {}件の画像クエリ: {}", entries.len(), config_path.display());

            let access_key = if dry_run {
                println!("\n=== ドライラン（ダウンロードしません） ===\n");
                String::new()
            } else {
                config.require_api_key(&cwd)?
            };
            println!("  保存先: {}", output.display());
            println!("  クレジット: {}\n", attribution.display());

            let client = photos::UnsplashClient::new(
                access_key,
                Duration::from_secs(config.search_timeout_seconds),
                Duration::from_secs(config.download_timeout_seconds),
            )?;
            let options = photos::PhotoOptions {
                output_dir: output,
                attribution_path: attribution,
                dry_run,
                force,
                delay: config.request_delay(),
                today: chrono::Local::now().format("%Y-%m-%d").to_string(),
            };
            let report = photos::run_downloads(&client, &entries, &options).await?;
            Ok(!report.has_failures())
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  取得元URL: {}", config.source_html_base);
                println!("  ローカルプレフィックス: {}", config.local_prefix_root);
                println!("  リクエスト間隔: {}ms", config.request_delay_ms);
                println!("  検索タイムアウト: {}秒", config.search_timeout_seconds);
                println!("  ダウンロードタイムアウト: {}秒", config.download_timeout_seconds);
                println!("  APIキー: {}", config.masked_api_key());
            }
            Ok(true)
        }
    }
}
