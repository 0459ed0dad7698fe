/*!

This is the long-form manual for `delegate_desk` and `campaign-desk`.

## Scopes

Every user is attached to one scope:

* `GLOBAL`: sees every chamber;
* `REGION` with a `scopeId`: sees the chambers whose `regionId` is exactly that id.
  Regions do not nest;
* `CHAMBER` with a `scopeId`: sees that one chamber, or nothing if the id matches
  no chamber.

Anything else (an unknown tag, or a `REGION`/`CHAMBER` scope without a `scopeId`)
sees nothing. Delegates and historical results are visible when their chamber is.
Factions and election periods are always visible.

Scopes only decide what is shown. They are not a security boundary, and roles
(`ADMIN`, `STRATEGY`, `MANAGER`, `AUDITOR`) are not checked at all.

## The weighted vote projection

Each delegate gets a weight `W = S * T * R`:

| factor | value |
|--------|-------|
| `S` status | `CERTAIN` 1.0, `UNDECIDED` 0.55, `RISKY` 0.25, `NEGATIVE` and anything else 0.0 |
| `T` recency | `d <= 30` 1.0, `31 <= d <= 60` 0.85, `d > 60` 0.65 |
| `R` risk | `1 - riskScore / 150` |

where `d` is the number of whole days since the last contact (rounded down, and
negative for a contact date in the future, which counts as recent).

The projected total is the sum of the weights of the visible delegates. Progress is
`total / 450 * 100` and may exceed 100.

Example: a `RISKY` delegate with a risk score of 75, last contacted 90 days ago,
weighs `0.25 * 0.65 * 0.5 = 0.08125`.

All the coefficients can be changed in the `projection` section of the desk file.

## Desk file

`campaign-desk` starts from built-in seed data. A desk file (JSON) can replace any
of the sections. The keys follow the names used by the dashboard:

```text
{
  "regions":   [{"id": "reg-01", "name": "Marmara", "description": ""}],
  "chambers":  [{"id": "ch-s39", "name": "İSTANBUL SMMMO", "city": "İstanbul",
                 "regionId": "reg-01", "totalMembers": 52400, "totalDelegates": 168}],
  "factions":  [{"id": "f-01", "name": "TÜMDEP", "description": "", "color": "#3b82f6"}],
  "periods":   [{"id": "ep-28", "year": 2028, "label": "2028", "isActive": true,
                 "totalDelegates": 450}],
  "results":   [{"id": "res-1", "periodId": "ep-24", "year": 2024, "chamberId": "ch-s39",
                 "factionId": "f-01", "votes": 72}],
  "delegates": [{"id": "1", "name": "Mehmet Özdemir", "chamberId": "ch-s39",
                 "status": "CERTAIN", "lastContactDate": "2025-05-10", "riskScore": 5,
                 "currentGroup": "f-01", "tendency": "", "electionYear": 2028}],
  "users":     [{"id": "u-1", "name": "HQ", "email": "hq@example.org", "role": "ADMIN",
                 "scopeType": "GLOBAL", "isActive": true}],
  "projection": {"targetVotes": 450, "riskDivisor": 150}
}
```

Numbers may be given as JSON numbers or as strings. A count that cannot be read
(`"totalMembers": "n/a"`) is taken as zero and a warning is logged. Risk scores are
clamped into `[0, 100]`.

References must resolve: a chamber pointing at an unknown region, or a delegate
pointing at an unknown chamber, is an error. Result rows that share a period,
chamber and faction are merged.

## Actions file

`campaign-desk apply` reads a JSON array of actions, each tagged by `type`:

```text
[
  {"type": "setActivePeriod", "id": "ep-24"},
  {"type": "recordResult", "periodId": "ep-24", "chamberId": "ch-s7",
   "factionId": "f-01", "votes": 40},
  {"type": "markCertain", "delegateId": "3"},
  {"type": "escalateRisk", "delegateId": "2"},
  {"type": "updateDelegate", "delegateId": "2", "patch": {"tendency": "Close"}}
]
```

The delegate update actions (`updateDelegate`, `markCertain`, `escalateRisk`) are
recorded in the audit log in the name of the acting user (`--user`). An action that
is refused (unknown id, dangling reference, duplicate id) stops the run and nothing
is applied.

Unlike the desk file, actions only accept the four known statuses; `addDelegate`
or `updateDelegate` with any other status tag stops the run like a refused action.

## Strategic analysis

`campaign-desk analyze` sends a reduced snapshot of the visible data to the Gemini
API and prints the structured report. The key is read from `API_KEY` (or
`GEMINI_API_KEY`). If the call fails for any reason, the output says that no
analysis is available; the failure itself is only logged. The request has no timeout.

 */
