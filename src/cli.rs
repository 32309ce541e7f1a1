use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metron-chat")]
#[command(about = "Metron - extração de certificados de calibração pela linha de comando", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 接続先サーバー（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// テキストメッセージを送信
    Chat {
        /// メッセージ本文
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// PDFをアップロードして抽出結果を待つ
    Upload {
        /// PDFファイルまたはフォルダ
        paths: Vec<PathBuf>,

        /// 抽出時のコマンド（例: "listar tags"）
        #[arg(short, long)]
        command: Option<String>,

        /// サーバー側で取得させるPDFのURL
        #[arg(long)]
        pdf_url: Option<String>,

        /// 抽出結果のJSON出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// タスクの状態を1回だけ取得
    Status {
        /// タスクID
        #[arg(required = true)]
        task_id: String,
    },

    /// 抽出結果をデータベースに登録
    Insert {
        /// 抽出結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// ユーザーID（省略時は設定値、無ければ入力を求める）
        #[arg(short, long)]
        user_id: Option<i64>,
    },

    /// 抽出結果からSQLを生成
    Sql {
        /// 抽出結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル（デフォルト: instrumentos_<日時>.sql）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// サーバー側のセッションキャッシュを削除
    ClearCache,

    /// 設定を表示/編集
    Config {
        /// サーバーURLを設定
        #[arg(long)]
        set_server: Option<String>,

        /// ユーザーIDを設定
        #[arg(long)]
        set_user_id: Option<i64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
