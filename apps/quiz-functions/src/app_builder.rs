//! # パイプライン構築
//!
//! 関数名に対応するハンドラを State とともにパイプラインへ組み込む。
//!
//! | 関数 | JSON ボディ解析 | エラー変換 |
//! |------|----------------|-----------|
//! | `createQuiz` / `addQuestion` | あり | あり |
//! | `getAllQuizzes` / `getQuizQuestions` / `deleteQuiz` | なし | あり |
//! | `registerUser` / `loginUser` | あり | あり |

use std::sync::Arc;

use crate::{
    function::{QuizFunction, UserFunction},
    handler::{
        QuizState,
        UserState,
        add_question,
        create_quiz,
        delete_quiz,
        get_all_quizzes,
        get_quiz_questions,
        login_user,
        register_user,
    },
    pipeline::{ApiEvent, Pipeline},
};

/// クイズ関数のパイプラインを構築する
pub fn quiz_pipeline(function: QuizFunction, state: Arc<QuizState>) -> Pipeline {
    let pipeline = match function {
        QuizFunction::CreateQuiz => {
            Pipeline::new(move |event: ApiEvent| create_quiz(state.clone(), event))
        }
        QuizFunction::GetAllQuizzes => {
            Pipeline::new(move |event: ApiEvent| get_all_quizzes(state.clone(), event))
        }
        QuizFunction::GetQuizQuestions => {
            Pipeline::new(move |event: ApiEvent| get_quiz_questions(state.clone(), event))
        }
        QuizFunction::AddQuestion => {
            Pipeline::new(move |event: ApiEvent| add_question(state.clone(), event))
        }
        QuizFunction::DeleteQuiz => {
            Pipeline::new(move |event: ApiEvent| delete_quiz(state.clone(), event))
        }
    };

    let pipeline = if function.consumes_body() {
        pipeline.parse_json_body()
    } else {
        pipeline
    };

    pipeline.translate_errors(function.fallback_message())
}

/// ユーザー関数のパイプラインを構築する
pub fn user_pipeline(function: UserFunction, state: Arc<UserState>) -> Pipeline {
    let pipeline = match function {
        UserFunction::RegisterUser => {
            Pipeline::new(move |event: ApiEvent| register_user(state.clone(), event))
        }
        UserFunction::LoginUser => {
            Pipeline::new(move |event: ApiEvent| login_user(state.clone(), event))
        }
    };

    pipeline
        .parse_json_body()
        .translate_errors(function.fallback_message())
}
