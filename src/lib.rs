//! mockup-kit
//!
//! - download: 表からHTMLスニペットを取得して manifest.json を作る
//! - preprocess: スニペットを構造パターン・トークン・画像クエリ・ページ構成に変換する
//! - photos: 画像クエリごとに写真を取得してクレジットを記録する

pub mod cli;
pub mod config;
pub mod error;
pub mod table;
pub mod snippet;
pub mod preprocess;
pub mod photos;
