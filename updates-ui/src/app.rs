use crate::bridge::FetchTransport;
use crate::dom::{self, CollapseTimer};
use leptos::*;
use tracing::{debug, warn};
use updates_core::{load_feed, report_failure, Board, IntroGate, RowState, UpdateItem, WidgetConfig};
use wasm_bindgen_futures::spawn_local;

type RowBoard = RwSignal<Board<CollapseTimer>>;

#[component]
pub fn UpdatesWidget(config: WidgetConfig, intro: IntroGate) -> impl IntoView {
    let board: RowBoard = create_rw_signal(Board::new(&config));
    let failure = create_rw_signal(None::<String>);
    let link_icon = store_value(config.link_icon.clone());

    spawn_local(async move {
        match load_feed(&FetchTransport, &config, intro).await {
            Ok(feed) => board.update(|b| b.render(feed)),
            Err(err) => {
                failure.set(Some(config.failure_message.clone()));
                report_failure(&FetchTransport, &config.endpoints, &err).await;
            }
        }
    });

    let generation = create_memo(move |_| board.with(Board::generation));

    view! {
      <Show
        when=move || failure.with(Option::is_none)
        fallback=move || view! {
          <div class="error-message">{move || failure.get().unwrap_or_default()}</div>
        }
      >
        <For
          each=move || {
              let _ = generation.get();
              board.with_untracked(Board::keyed_items)
          }
          key=|(key, _)| *key
          children=move |(key, item)| view! {
            <UpdateRow index=key.index item=item board=board link_icon=link_icon.get_value() />
          }
        />
      </Show>
    }
}

#[component]
fn UpdateRow(index: usize, item: UpdateItem, board: RowBoard, link_icon: String) -> impl IntoView {
    let row_ref = create_node_ref::<html::Div>();
    let label_ref = create_node_ref::<html::Span>();
    let detail_ref = create_node_ref::<html::Div>();
    let state = create_memo(move |_| board.with(|b| b.row(index).cloned().unwrap_or_default()));

    let on_click = move |_| {
        let Some(epoch) = board.try_update(|b| b.expand(index)).flatten() else {
            return;
        };

        let delay = board.with_untracked(|b| b.animation().collapse_delay());
        let expire = move || {
            board.update(|b| {
                b.expire(index, epoch);
            });
        };
        match set_timeout_with_handle(expire, delay) {
            Ok(handle) => board.update(|b| b.attach_timer(index, epoch, CollapseTimer(handle))),
            Err(e) => {
                warn!(row = index, error = ?e, "failed to schedule auto-collapse");
                board.update(|b| {
                    b.expire(index, epoch);
                });
                return;
            }
        }

        request_animation_frame(move || {
            let Some(measurements) = dom::measure(row_ref, label_ref, detail_ref) else {
                debug!(row = index, "expanded row not mounted, skipping measurement");
                return;
            };
            board.update(|b| {
                b.apply_measurement(index, epoch, measurements);
            });
        });
    };

    let name = item.platform_name.clone();
    let name_cell = move || match state.get() {
        RowState::Collapsed => name.clone().into_view(),
        RowState::Expanded(expansion) => view! {
          <span class="platform-name-text" node_ref=label_ref>{expansion.label}</span>
          <div
            class=expansion.scroll.container_class()
            style=expansion.scroll.container_style()
          >
            <div class="date-scroll-inner italic-text" node_ref=detail_ref>{expansion.detail}</div>
          </div>
        }
        .into_view(),
    };

    let link = item.link().map(|href| {
        view! {
          <a href=href.to_string() target="_blank" rel="noopener noreferrer" title=item.link_title()>
            <img src=link_icon alt="External link" class="link-icon" />
          </a>
        }
    });

    view! {
      <div class=move || state.with(|s| s.classes().row) node_ref=row_ref on:click=on_click>
        <div class=move || state.with(|s| s.classes().name)>{name_cell}</div>
        <div class=move || state.with(|s| s.classes().time) title=item.full_date.clone()>
          {item.time_ago.clone()}
        </div>
        <div class="link-cell">{link}</div>
      </div>
    }
}
