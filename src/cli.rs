use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mockup-kit")]
#[command(about = "HTMLモックアップ取得・前処理・写真取得ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 表に載っているHTMLスニペットをダウンロード
    Download {
        /// 入力表（CSV/Excel）。省略時はカレントの唯一の表ファイル
        #[arg(short, long)]
        table: Option<PathBuf>,

        /// スニペットの保存先
        #[arg(short, long, default_value = "html")]
        out_dir: PathBuf,

        /// manifest.json の出力先
        #[arg(short, long, default_value = "manifest.json")]
        manifest: PathBuf,

        /// 既存ファイルも取り直す
        #[arg(long)]
        force: bool,
    },

    /// スニペットを前処理（トークン・構造パターン・画像クエリ・ページ構成）
    Preprocess {
        /// スニペットのフォルダ
        #[arg(long, default_value = "html")]
        html_dir: PathBuf,

        /// manifest.json
        #[arg(short, long, default_value = "manifest.json")]
        manifest: PathBuf,

        /// 出力フォルダ
        #[arg(short, long, default_value = "preprocessed")]
        output_dir: PathBuf,
    },

    /// image-config.json の写真を一括取得
    Photos {
        /// 画像クエリファイル
        #[arg(short, long, default_value = "preprocessed/image-config.json")]
        config: PathBuf,

        /// 写真の保存先
        #[arg(short, long, default_value = "photos")]
        output: PathBuf,

        /// クレジットファイル
        #[arg(short, long, default_value = "ATTRIBUTION.md")]
        attribution: PathBuf,

        /// 取得せずに予定だけ表示
        #[arg(long)]
        dry_run: bool,

        /// 既存ファイルも取り直す
        #[arg(long)]
        force: bool,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
