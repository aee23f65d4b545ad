use crate::storage::LocalStore;
use crate::utils::*;
use clap::Args;
use geocoin_core as game;
use std::collections::{BTreeMap, BTreeSet};
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Command(game::Command),
    SelectCache(game::Cell),
    CloseCache,
    Reset,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    cell: game::Cell,
    #[prop_or_default]
    coins: Option<game::Coins>,
    #[prop_or_default]
    player: bool,
    #[prop_or_default]
    trail: bool,
    #[prop_or_default]
    selected: bool,
    callback: Callback<game::Cell>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        cell,
        coins,
        player,
        trail,
        selected,
        callback,
    } = props.clone();

    let mut class = classes!("cell");
    if player {
        class.push("player");
    }
    if trail {
        class.push("trail");
    }
    if selected {
        class.push("selected");
    }

    match coins {
        Some(coins) => {
            class.push("cache");
            if coins == 0 {
                class.push("empty");
            }
            let onclick = Callback::from(move |_: MouseEvent| {
                log::trace!("cache {} clicked", cell);
                callback.emit(cell);
            });
            html! {
                <td {class} {onclick} title={cell.to_string()}>{coins.to_string()}</td>
            }
        }
        None => html! {
            <td {class}/>
        },
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct MapProps {
    /// Name of the world to play in, every world has its own cache layout
    #[arg(short, long)]
    pub(crate) world: Option<String>,
}

pub(crate) struct MapView {
    session: game::Session,
    store: LocalStore,
    player_cell: game::Cell,
    caches: BTreeMap<game::Cell, game::Coins>,
    trail: BTreeSet<game::Cell>,
    selected: Option<game::Cell>,
}

impl MapView {
    /// Recomputes everything the view draws from the session.
    fn refresh(&mut self) {
        self.player_cell = *self.session.player_cell();
        self.caches = self
            .session
            .nearby_caches()
            .into_iter()
            .map(|cache| (*cache.cell, cache.coins))
            .collect();
        self.trail = self
            .session
            .trail_cells()
            .into_iter()
            .map(|cell| *cell)
            .collect();
        self.selected = self.selected.filter(|cell| self.caches.contains_key(cell));
    }

    fn apply(&mut self, command: game::Command) -> bool {
        let outcome = match game::dispatch_and_save(&mut self.store, &mut self.session, command) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("{:?} rejected: {}", command, err);
                return false;
            }
        };

        if !outcome.has_update() {
            return false;
        }

        log::debug!("outcome: {:?}", outcome);
        if matches!(outcome, game::Outcome::Reset) {
            self.selected = None;
        }

        self.refresh();
        true
    }

    fn selected_cache(&self) -> Option<(game::Cell, game::Coins)> {
        let cell = self.selected?;
        self.caches.get(&cell).map(|&coins| (cell, coins))
    }

    fn view_cache_panel(&self, ctx: &Context<Self>) -> Html {
        let Some((cell, coins)) = self.selected_cache() else {
            return html! {};
        };
        let player_coins = self.session.player().coins;

        let cb_collect = ctx
            .link()
            .callback(move |_| Msg::Command(game::Command::Collect(cell)));
        let cb_deposit = ctx
            .link()
            .callback(move |_| Msg::Command(game::Command::Deposit(cell)));
        let cb_close = ctx.link().callback(|_| Msg::CloseCache);

        html! {
            <article class="cache-panel">
                <header>{format!("Cache {}", cell)}</header>
                <p>{format!("It has {}.", format_coins(coins))}</p>
                <footer>
                    <button onclick={cb_collect} disabled={coins == 0}>{"Collect"}</button>
                    <button onclick={cb_deposit} disabled={player_coins == 0}>{"Deposit"}</button>
                    <button onclick={cb_close}>{"Close"}</button>
                </footer>
            </article>
        }
    }
}

impl Component for MapView {
    type Message = Msg;
    type Properties = MapProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = game::GameConfig::default();
        let generator =
            game::LuckGenerator::from_config(&config).with_world(ctx.props().world.clone());
        let store = LocalStore;
        let session = game::restore(&store, config, generator);

        let mut view = Self {
            session,
            store,
            player_cell: game::Cell::new(0, 0),
            caches: BTreeMap::new(),
            trail: BTreeSet::new(),
            selected: None,
        };
        view.refresh();
        view
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Command(command) => self.apply(command),
            SelectCache(cell) => self.selected.replace(cell) != Some(cell),
            CloseCache => self.selected.take().is_some(),
            Reset => {
                if confirm("Are you sure you want to erase your game state?") {
                    self.apply(game::Command::Reset)
                } else {
                    false
                }
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use game::Direction::*;

        let radius = self.session.config().neighborhood_size;
        let player = self.session.player();
        let status = format!(
            "{} at {}",
            format_coins(player.coins),
            format_position(player.position)
        );

        let step = |direction: game::Direction| {
            ctx.link()
                .callback(move |_: MouseEvent| Msg::Command(game::Command::Step(direction)))
        };
        let cb_reset = ctx.link().callback(|_| Msg::Reset);
        let cb_select = ctx.link().callback(Msg::SelectCache);

        html! {
            <div class="geocoin">
                <nav>
                    <button onclick={step(North)} title="North">{"⬆️"}</button>
                    <button onclick={step(South)} title="South">{"⬇️"}</button>
                    <button onclick={step(West)} title="West">{"⬅️"}</button>
                    <button onclick={step(East)} title="East">{"➡️"}</button>
                    <button onclick={cb_reset} title="Reset">{"🚮"}</button>
                </nav>
                <aside>{status}</aside>
                <table>
                    {
                        for grid_rows(self.player_cell.indices(), radius).map(|row| html! {
                            <tr>
                                {
                                    for row.into_iter().map(|indices| {
                                        let cell = game::Cell::from(indices);
                                        let coins = self.caches.get(&cell).copied();
                                        let player = cell == self.player_cell;
                                        let trail = self.trail.contains(&cell);
                                        let selected = self.selected == Some(cell);
                                        let callback = cb_select.clone();
                                        html! {
                                            <CellView {cell} {coins} {player} {trail} {selected} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                {self.view_cache_panel(ctx)}
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_message_carries_the_cell() {
        let cell = game::Cell::new(3, 4);
        assert_eq!(Msg::SelectCache(cell), Msg::SelectCache(game::Cell::new(3, 4)));
        assert_ne!(Msg::SelectCache(cell), Msg::CloseCache);
    }

    #[test]
    fn world_argument_is_optional() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cli {
            #[command(flatten)]
            map: MapProps,
        }

        let cli = Cli::try_parse_from(["", "--world=moon"]).unwrap();
        assert_eq!(cli.map.world.as_deref(), Some("moon"));

        let cli = Cli::try_parse_from([""]).unwrap();
        assert_eq!(cli.map.world, None);
    }
}
